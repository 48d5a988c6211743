//! Error types for the streaming driver.

use tarsos_filter_analysis::AnalysisError;

/// Errors reported while feeding blocks through a driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The filter produced non-finite output or the output gain collapsed.
    ///
    /// Terminal for the current filter; a new filter must be selected.
    #[error("filter is unstable: {reason}")]
    Unstable {
        /// What was observed
        reason: String,
    },

    /// The stream was stopped.
    #[error("stream has finished")]
    Finished,

    /// A planar block did not carry one buffer per channel.
    #[error("expected {expected} channels, got {actual}")]
    ChannelMismatch {
        /// Channels the driver was built with
        expected: usize,
        /// Buffers supplied
        actual: usize,
    },

    /// Setting up convolution for a new filter failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Convenience result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = DriverError::Unstable {
            reason: "gain underflow".into(),
        };
        assert_eq!(e.to_string(), "filter is unstable: gain underflow");
        assert_eq!(DriverError::Finished.to_string(), "stream has finished");
        let e = DriverError::ChannelMismatch {
            expected: 2,
            actual: 1,
        };
        assert_eq!(e.to_string(), "expected 2 channels, got 1");
    }

    #[test]
    fn analysis_errors_convert() {
        let e: DriverError = AnalysisError::EmptyKernel.into();
        assert!(matches!(e, DriverError::Analysis(_)));
    }
}
