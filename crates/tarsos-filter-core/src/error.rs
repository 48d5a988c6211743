//! Error type shared by the realization primitives.

use alloc::string::String;

/// Errors raised while building or evaluating filters.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed coefficient arrays (mismatched lengths, empty lists, unordered taps).
    Config(String),
    /// A buffer or transform size that must be a power of two was not.
    InvalidSize(usize),
    /// A numeric operation left its domain (e.g. division by a zero-magnitude complex).
    Domain(&'static str),
}

impl CoreError {
    /// Create a configuration error from any message.
    pub fn config(msg: impl Into<String>) -> Self {
        CoreError::Config(msg.into())
    }
}

#[cfg(feature = "std")]
impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid filter configuration: {msg}"),
            Self::InvalidSize(n) => write!(f, "size {n} is not a power of two"),
            Self::Domain(msg) => write!(f, "domain error: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn config_display() {
        let err = CoreError::config("taps must start at 0");
        assert_eq!(
            err.to_string(),
            "invalid filter configuration: taps must start at 0"
        );
    }

    #[test]
    fn invalid_size_display() {
        assert_eq!(
            CoreError::InvalidSize(12).to_string(),
            "size 12 is not a power of two"
        );
    }

    #[test]
    fn domain_display() {
        let err = CoreError::Domain("division by zero");
        assert_eq!(err.to_string(), "domain error: division by zero");
    }
}
