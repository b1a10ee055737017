//! Simulation configuration
//!
//! Every tunable lives in one serde-serializable struct. `Default` yields the
//! reference values; `validate` is called once when a simulation is built.

use crate::error::{require_non_negative, require_range, SimulationError};
use crate::grid::ClassifierConfig;
use crate::solver::{ExecutionMode, TransitionParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reference raster width
pub const DEFAULT_WIDTH: usize = 928;
/// Reference raster height
pub const DEFAULT_HEIGHT: usize = 800;
/// Reference tick cadence
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
/// Frames an ignition marker stays visible
pub const OUTLINE_DISPLAY_LENGTH: u32 = 5;
/// Blend factor of the sharpen pre-pass
pub const SHARPEN_AMOUNT: f64 = 0.3;

/// Full configuration of a [`WildfireSimulation`](super::WildfireSimulation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    /// Multiplier on the spontaneous ignition probability
    pub scale_factor: f64,
    /// Cadence at which an external driver calls `tick`
    pub tick_interval_ms: u64,
    /// Frames before an ignition marker is evicted
    pub outline_display_length: u32,
    /// Sharpen blend applied to rasters before classification (0 disables)
    pub sharpen_amount: f64,
    /// Seed for reproducible runs; `None` draws from entropy
    pub seed: Option<u64>,
    pub execution: ExecutionMode,
    pub classifier: ClassifierConfig,
    pub transition: TransitionParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale_factor: 1.0,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            outline_display_length: OUTLINE_DISPLAY_LENGTH,
            sharpen_amount: SHARPEN_AMOUNT,
            seed: None,
            execution: ExecutionMode::default(),
            classifier: ClassifierConfig::default(),
            transition: TransitionParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Reference configuration at a custom size
    pub fn with_dimensions(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check every field against its domain
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.width == 0 {
            return Err(SimulationError::invalid("width", "must be at least 1 cell"));
        }
        if self.height == 0 {
            return Err(SimulationError::invalid("height", "must be at least 1 cell"));
        }
        require_non_negative("scale_factor", self.scale_factor)?;
        if self.tick_interval_ms == 0 {
            return Err(SimulationError::invalid(
                "tick_interval_ms",
                "must be at least 1 ms",
            ));
        }
        if self.outline_display_length == 0 {
            return Err(SimulationError::invalid(
                "outline_display_length",
                "must be at least 1 frame",
            ));
        }
        require_range("sharpen_amount", self.sharpen_amount, 0.0, 1.0)?;
        self.classifier.validate()?;
        self.transition.validate()?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_and_valid() {
        let config = SimulationConfig::default();
        assert_eq!((config.width, config.height), (928, 800));
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_domain_values() {
        let cases = [
            SimulationConfig {
                width: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                scale_factor: -1.0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                scale_factor: f64::NAN,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                sharpen_amount: 2.0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                outline_display_length: 0,
                ..SimulationConfig::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "accepted {config:?}");
        }
    }

    #[test]
    fn test_nested_errors_name_field() {
        let mut config = SimulationConfig::default();
        config.transition.random_burn_rate_probability = 3.0;
        match config.validate() {
            Err(SimulationError::InvalidConfiguration { parameter, .. }) => {
                assert_eq!(parameter, "random_burn_rate_probability");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
