//! Error types for rlbook

use thiserror::Error;

/// Main error type for rlbook algorithms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RlError {
    #[error("Configuration error: no action provided")]
    EmptyActionSet,

    #[error("Configuration error: no state provided")]
    EmptyStateSpace,

    #[error("Configuration error: epsilon {0} is not within the [0, 1] probability range")]
    InvalidEpsilon(f64),

    #[error("Configuration error: gamma {0} is not within the [0, 1] discount range")]
    InvalidGamma(f64),

    #[error("Configuration error: invalid theta threshold {0}")]
    InvalidTheta(f64),

    #[error("Sampling error: invalid probability {0}")]
    InvalidProbability(f64),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Policy evaluation did not converge after {sweeps} sweeps (delta = {delta})")]
    NotConverged { sweeps: usize, delta: f64 },
}

impl RlError {
    /// Whether the error is a construction-time configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            RlError::EmptyActionSet
                | RlError::EmptyStateSpace
                | RlError::InvalidEpsilon(_)
                | RlError::InvalidGamma(_)
                | RlError::InvalidTheta(_)
        )
    }
}

/// Result type alias for rlbook operations
pub type Result<T> = std::result::Result<T, RlError>;

/// Check that `p` is a probability, ie. a finite number in [0, 1]
pub(crate) fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors() {
        assert!(RlError::EmptyActionSet.is_config());
        assert!(RlError::InvalidEpsilon(1.5).is_config());
        assert!(RlError::InvalidTheta(-1.0).is_config());
        assert!(!RlError::InvalidProbability(2.0).is_config());
        assert!(!RlError::NotConverged { sweeps: 3, delta: 0.5 }.is_config());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RlError::EmptyActionSet.to_string(),
            "Configuration error: no action provided"
        );
        assert!(RlError::InvalidEpsilon(1.5).to_string().contains("1.5"));
    }

    #[test]
    fn test_is_probability() {
        assert!(is_probability(0.0));
        assert!(is_probability(1.0));
        assert!(!is_probability(-0.1));
        assert!(!is_probability(f64::NAN));
    }
}
