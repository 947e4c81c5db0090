//! Error types for inclination estimation.
//!
//! - Configuration errors: rejected before any computation runs
//! - Degenerate samples: every Monte-Carlo trial fell outside the arcsine domain
//! - Numerical errors: quadrature produced a non-finite result

use thiserror::Error;

/// Top-level error type for the inclination pipeline.
#[derive(Debug, Error)]
pub enum InclinationError {
    #[error("Invalid trial count: {0} (must be a positive integer)")]
    InvalidTrialCount(usize),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(
        "All {trials} Monte-Carlo trials gave |sin i| > 1; \
         vsin(i), period and radius are inconsistent, no inclination can be estimated"
    )]
    DegenerateSample { trials: usize },

    #[error("Numerical integration failed: {0}")]
    Integration(String),
}

impl InclinationError {
    /// Create an invalid-parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by user configuration rather than the data.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidTrialCount(_) | Self::InvalidParameter { .. })
    }
}

/// Result type alias for the inclination pipeline.
pub type Result<T> = std::result::Result<T, InclinationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_sample_message_is_descriptive() {
        let err = InclinationError::DegenerateSample { trials: 42 };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("inconsistent"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_classification() {
        assert!(InclinationError::InvalidTrialCount(0).is_configuration());
        assert!(InclinationError::invalid_parameter("radius", "negative").is_configuration());
        assert!(!InclinationError::Integration("nan".into()).is_configuration());
    }
}
