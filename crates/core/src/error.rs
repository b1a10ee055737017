//! Error types for simulation construction
//!
//! Every failure is raised while building a simulation (configuration checks,
//! input dimension checks). Once a simulation exists, stepping it cannot fail.

use thiserror::Error;

/// Errors raised while constructing a simulation or its inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Initialization input does not cover the configured `width × height`
    #[error(
        "dimension mismatch: expected {expected_width}x{expected_height} = {} samples, got {actual}",
        .expected_width * .expected_height
    )]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual: usize,
    },

    /// A probability, threshold, Gaussian parameter or dimension is outside its domain
    #[error("invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },
}

impl SimulationError {
    /// Shorthand for [`SimulationError::InvalidConfiguration`]
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Check that `value` is finite
pub(crate) fn require_finite(parameter: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            parameter,
            format!("must be finite, got {value}"),
        ))
    }
}

/// Check that `value` is finite and not negative
pub(crate) fn require_non_negative(
    parameter: &'static str,
    value: f64,
) -> Result<(), SimulationError> {
    require_finite(parameter, value)?;
    if value < 0.0 {
        return Err(SimulationError::invalid(
            parameter,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

/// Check that `value` is finite and strictly positive
pub(crate) fn require_positive(parameter: &'static str, value: f64) -> Result<(), SimulationError> {
    require_finite(parameter, value)?;
    if value <= 0.0 {
        return Err(SimulationError::invalid(
            parameter,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}

/// Check that `value` is a probability in `[0, 1]`
pub(crate) fn require_probability(
    parameter: &'static str,
    value: f64,
) -> Result<(), SimulationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            parameter,
            format!("must lie in [0, 1], got {value}"),
        ))
    }
}

/// Check that `value` lies in the closed range `[min, max]`
pub(crate) fn require_range(
    parameter: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), SimulationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            parameter,
            format!("must lie in [{min}, {max}], got {value}"),
        ))
    }
}
