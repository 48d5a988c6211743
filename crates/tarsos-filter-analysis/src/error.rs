//! Error types for spectral and response analysis.

use tarsos_filter_core::CoreError;
use thiserror::Error;

/// Errors raised by the FFT engine, response tables and block convolver.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// FFT size is not a non-zero power of two.
    #[error("FFT size {0} is not a power of two")]
    InvalidSize(usize),

    /// Interleaved buffer does not match the engine size.
    #[error("expected {expected} interleaved values, got {actual}")]
    LengthMismatch {
        /// Required slice length (`2 * size`)
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Convolution kernel has no taps.
    #[error("convolution kernel is empty")]
    EmptyKernel,

    /// Transfer function evaluation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
