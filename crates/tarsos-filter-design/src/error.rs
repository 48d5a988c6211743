//! Error types for filter design.

use tarsos_filter_analysis::AnalysisError;
use tarsos_filter_core::CoreError;
use thiserror::Error;

/// Errors raised while turning a [`FilterFamily`](crate::FilterFamily) into a filter.
#[derive(Debug, Error)]
pub enum DesignError {
    /// A parameter is outside the range the family can design for.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Coefficient construction or transfer evaluation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Response table or FFT failure.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl DesignError {
    /// Create an invalid-parameter error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        DesignError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias for design operations.
pub type Result<T> = std::result::Result<T, DesignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let err = DesignError::invalid("ripple_db", "must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'ripple_db': must be positive, got -1"
        );
    }

    #[test]
    fn wraps_lower_layers() {
        let err: DesignError = AnalysisError::InvalidSize(3).into();
        assert!(matches!(err, DesignError::Analysis(_)));
        let err: DesignError = CoreError::config("bad").into();
        assert!(err.to_string().contains("bad"));
    }
}
