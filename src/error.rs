//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Lookups that miss and deletes of absent keys are not errors; only
/// construction can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Configuration that cannot be normalized into a usable cache
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Maintenance was requested outside of a tokio runtime
    #[error("No tokio runtime available to run maintenance")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidConfig("interval is zero".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: interval is zero");
        assert_eq!(
            CacheError::NoRuntime.to_string(),
            "No tokio runtime available to run maintenance"
        );
    }
}
