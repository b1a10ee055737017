//! Simulation context
//!
//! `WildfireSimulation` owns everything that changes between ticks: the current
//! generation snapshot, the random streams, the ignition log and the generation
//! counter. Each tick computes the next generation from a frozen snapshot and
//! publishes it by swapping the shared `Arc<Grid>`, so readers holding an older
//! snapshot are never affected by a step in progress.

pub mod config;
pub mod stats;

pub use config::{
    SimulationConfig, DEFAULT_HEIGHT, DEFAULT_TICK_INTERVAL_MS, DEFAULT_WIDTH,
    OUTLINE_DISPLAY_LENGTH, SHARPEN_AMOUNT,
};
pub use stats::SimulationStats;

use crate::core_types::{CellState, Coordinate, EntropyStreams, RandomVariate, Rgb, SeededStreams};
use crate::error::{require_positive, SimulationError};
use crate::grid::{Grid, RgbRaster, TerrainClassifier};
use crate::solver::{IgnitionEventLog, StepOutcome, TransitionEngine};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one tick
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Generation number of `grid`
    pub generation: u64,
    /// The newly published generation
    pub grid: Arc<Grid>,
    /// Coordinates added to the ignition log this tick, in raster order
    pub new_ignitions: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy)]
enum StreamSource {
    Seeded(SeededStreams),
    Entropy(EntropyStreams),
}

/// A running wildfire cellular automaton
#[derive(Debug)]
pub struct WildfireSimulation {
    config: SimulationConfig,
    engine: TransitionEngine,
    streams: StreamSource,
    grid: Arc<Grid>,
    ignition_log: IgnitionEventLog,
    generation: u64,
}

impl WildfireSimulation {
    /// Build a simulation from a color raster
    ///
    /// The raster is sharpened by `config.sharpen_amount` and then classified.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an invalid config and
    /// `DimensionMismatch` when the raster is not `config.width × config.height`.
    pub fn from_raster(config: SimulationConfig, raster: &RgbRaster) -> Result<Self, SimulationError> {
        config.validate()?;
        if raster.width() != config.width || raster.height() != config.height {
            return Err(SimulationError::DimensionMismatch {
                expected_width: config.width,
                expected_height: config.height,
                actual: raster.pixels().len(),
            });
        }

        let classifier = TerrainClassifier::new(config.classifier)?;
        let sharpened = raster.sharpened(config.sharpen_amount)?;
        let grid = classifier.classify_raster(&sharpened)?;
        Self::from_grid(config, grid)
    }

    /// Build a simulation from row-major color samples of `config.width × config.height`
    ///
    /// # Errors
    ///
    /// Same as [`WildfireSimulation::from_raster`].
    pub fn from_samples(config: SimulationConfig, samples: &[Rgb]) -> Result<Self, SimulationError> {
        let raster = RgbRaster::new(config.width, config.height, samples.to_vec())?;
        Self::from_raster(config, &raster)
    }

    /// Build a simulation around an already classified grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an invalid config and
    /// `DimensionMismatch` when the grid size differs from the config.
    pub fn from_grid(config: SimulationConfig, grid: Grid) -> Result<Self, SimulationError> {
        config.validate()?;
        if grid.width() != config.width || grid.height() != config.height {
            return Err(SimulationError::DimensionMismatch {
                expected_width: config.width,
                expected_height: config.height,
                actual: grid.len(),
            });
        }

        let engine = TransitionEngine::new(config.transition)?;
        let streams = match config.seed {
            Some(seed) => StreamSource::Seeded(SeededStreams::new(seed)),
            None => StreamSource::Entropy(EntropyStreams),
        };

        let counts = grid.kind_counts();
        info!(
            width = config.width,
            height = config.height,
            trees = counts.tree,
            empty = counts.empty,
            seed = ?config.seed,
            execution = ?config.execution,
            "wildfire simulation initialized"
        );

        Ok(Self {
            config,
            engine,
            streams,
            grid: Arc::new(grid),
            ignition_log: IgnitionEventLog::new(),
            generation: 0,
        })
    }

    /// Advance one generation using the configured streams and execution mode
    pub fn tick(&mut self) -> StepReport {
        let generation = self.generation;
        let scale = self.config.scale_factor;
        let mode = self.config.execution;
        let outcome = match &self.streams {
            StreamSource::Seeded(s) => {
                self.engine
                    .step_streams(&self.grid, s, generation, scale, mode)
            }
            StreamSource::Entropy(s) => {
                self.engine
                    .step_streams(&self.grid, s, generation, scale, mode)
            }
        };
        self.publish(outcome)
    }

    /// Advance one generation drawing every variate from `rng` in raster order
    pub fn tick_with<R>(&mut self, rng: &mut R) -> StepReport
    where
        R: RandomVariate + ?Sized,
    {
        let outcome = self.engine.step(&self.grid, rng, self.config.scale_factor);
        self.publish(outcome)
    }

    fn publish(&mut self, outcome: StepOutcome) -> StepReport {
        let StepOutcome {
            grid,
            new_ignitions,
        } = outcome;

        self.ignition_log.record_all(new_ignitions.iter().copied());
        self.grid = Arc::new(grid);
        self.generation += 1;

        let counts = self.grid.kind_counts();
        debug!(
            generation = self.generation,
            burning = counts.burning,
            burned = counts.burned,
            trees = counts.tree,
            new_ignitions = new_ignitions.len(),
            "generation published"
        );

        StepReport {
            generation: self.generation,
            grid: Arc::clone(&self.grid),
            new_ignitions,
        }
    }

    /// Set a Tree cell on fire between ticks
    ///
    /// The change is published as a new snapshot of the current generation and
    /// is not recorded in the ignition log. Returns `Ok(false)` when `coord` is
    /// out of bounds or the cell is not a Tree.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `burn_rate` is not finite and positive.
    pub fn ignite(&mut self, coord: Coordinate, burn_rate: f64) -> Result<bool, SimulationError> {
        require_positive("burn_rate", burn_rate)?;

        let Some(&CellState::Tree {
            fuel,
            fuel_capacity,
            ..
        }) = self.grid.get(coord)
        else {
            warn!(%coord, "manual ignition rejected: not a tree cell");
            return Ok(false);
        };

        let burning = CellState::Burning {
            fuel,
            fuel_capacity,
            burn_rate,
        };
        match self.grid.with_cell(coord, burning) {
            Some(next) => {
                self.grid = Arc::new(next);
                debug!(%coord, burn_rate, "manual ignition");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Age ignition markers by one displayed frame and evict the expired ones
    pub fn advance_markers(&mut self) -> Vec<Coordinate> {
        self.ignition_log
            .age_and_evict(self.config.outline_display_length)
    }

    /// Shared handle to the current generation
    pub fn snapshot(&self) -> Arc<Grid> {
        Arc::clone(&self.grid)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    pub fn ignition_log(&self) -> &IgnitionEventLog {
        &self.ignition_log
    }

    pub fn ignition_log_mut(&mut self) -> &mut IgnitionEventLog {
        &mut self.ignition_log
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::collect(
            self.generation,
            &self.grid,
            self.config.transition.ignition_fuel_ratio,
            self.ignition_log.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            seed: Some(9),
            ..SimulationConfig::with_dimensions(4, 3)
        }
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let grid = Grid::filled(3, 3, CellState::tree(100.0)).unwrap();
        let err = WildfireSimulation::from_grid(small_config(), grid).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::DimensionMismatch {
                expected_width: 4,
                expected_height: 3,
                actual: 9
            }
        ));
        assert!(WildfireSimulation::from_samples(small_config(), &[Rgb::new(0, 0, 0); 11]).is_err());
    }

    #[test]
    fn test_snapshot_survives_tick() {
        let grid = Grid::filled(4, 3, CellState::tree(100.0)).unwrap();
        let mut sim = WildfireSimulation::from_grid(small_config(), grid).unwrap();
        let before = sim.snapshot();
        assert!(sim.ignite(Coordinate::new(1, 1), 60.0).unwrap());
        assert!(before.cell(Coordinate::new(1, 1)).is_tree());
        assert!(sim.grid().cell(Coordinate::new(1, 1)).is_burning());

        let report = sim.tick();
        assert_eq!(report.generation, 1);
        assert_eq!(sim.generation(), 1);
        assert!(Arc::ptr_eq(&report.grid, &sim.snapshot()));
        assert!(before.cell(Coordinate::new(1, 1)).is_tree());
    }

    #[test]
    fn test_manual_ignition_rules() {
        let mut cells = vec![CellState::tree(100.0); 12];
        cells[0] = CellState::Empty;
        let grid = Grid::new(4, 3, cells).unwrap();
        let mut sim = WildfireSimulation::from_grid(small_config(), grid).unwrap();

        assert!(!sim.ignite(Coordinate::new(0, 0), 50.0).unwrap());
        assert!(!sim.ignite(Coordinate::new(9, 9), 50.0).unwrap());
        assert!(sim.ignite(Coordinate::new(2, 2), 0.0).is_err());
        assert!(sim.ignite(Coordinate::new(2, 2), 50.0).unwrap());
        assert!(!sim.ignite(Coordinate::new(2, 2), 50.0).unwrap());
        assert!(sim.ignition_log().is_empty());
        assert_eq!(sim.stats().counts.burning, 1);
    }
}
