//! Generation stepping
//!
//! [`TransitionEngine`] computes the next grid from the current one plus injected
//! random draws. [`IgnitionEventLog`] collects the coordinates of spontaneous
//! ignitions for presentation layers.

pub mod ignition_log;
pub mod transition;

pub use ignition_log::IgnitionEventLog;
pub use transition::{
    CellUpdate, ExecutionMode, RegrowthStart, StepOutcome, TransitionEngine, TransitionParams,
    ENERGY_TRANSFER_RATE_MEAN, ENERGY_TRANSFER_RATE_STD_DEV, IGNITION_FUEL_RATIO,
    INITIAL_ENERGY_MEAN, INITIAL_ENERGY_STD_DEV, PROBABILITY_OF_FIRE_TRANSFER,
    RANDOM_BURN_RATE_PROBABILITY, REGROWTH_K_ITERATIONS,
};
