//! Wildfire Cellular Automaton Core Library
//!
//! A stochastic forest-fire model on a fixed two-dimensional grid. A color raster
//! is classified into empty ground and trees with a fuel capacity; each discrete
//! step then moves every cell through the `Tree → Burning → Burned → Tree` cycle
//! using neighbor-driven fire transfer, rare spontaneous ignitions, fuel
//! consumption and asymptotic regrowth.
//!
//! ## Layout
//!
//! - [`core_types`]: cell states, coordinates, colors and injectable randomness
//! - [`grid`]: the per-generation [`Grid`], color rasters and terrain classification
//! - [`solver`]: the [`TransitionEngine`] and the [`IgnitionEventLog`]
//! - [`simulation`]: the [`WildfireSimulation`] context driven once per tick
//!
//! ## Example
//!
//! ```rust
//! use wildfire_ca_core::{CellState, Grid, SimulationConfig, WildfireSimulation};
//!
//! let config = SimulationConfig {
//!     seed: Some(7),
//!     ..SimulationConfig::with_dimensions(16, 16)
//! };
//! let grid = Grid::filled(16, 16, CellState::tree(100.0)).unwrap();
//! let mut sim = WildfireSimulation::from_grid(config, grid).unwrap();
//! let report = sim.tick();
//! assert_eq!(report.generation, 1);
//! ```

pub mod core_types;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod solver;

pub use core_types::{
    CellKind, CellState, Coordinate, EntropyStreams, Hsv, RandomStreams, RandomVariate, Rgb,
    RngVariate, SeededStreams,
};
pub use error::SimulationError;
pub use grid::{ClassifierConfig, Grid, KindCounts, RgbRaster, TerrainClassifier};
pub use simulation::{SimulationConfig, SimulationStats, StepReport, WildfireSimulation};
pub use solver::{
    ExecutionMode, IgnitionEventLog, RegrowthStart, StepOutcome, TransitionEngine,
    TransitionParams,
};
