//! Error types for geocache.
//!
//! Every lookup outcome that is not a result is one of these variants.
//! Errors are `Clone` so that one upstream failure can be handed to every
//! caller waiting on the same in-flight lookup.

use thiserror::Error;

/// Result type alias using `GeoError`.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Main error type for all geocache operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeoError {
    /// Bad address or out-of-range coordinates. Never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The mapping provider could not produce a result (network error,
    /// timeout, malformed or empty response). Never cached.
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GeoError {
    /// Shorthand for an [`GeoError::InvalidInput`].
    pub fn invalid(message: impl Into<String>) -> Self {
        GeoError::InvalidInput(message.into())
    }

    /// Shorthand for an [`GeoError::UpstreamFailure`].
    pub fn upstream(message: impl Into<String>) -> Self {
        GeoError::UpstreamFailure(message.into())
    }

    /// Returns true if the caller is at fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, GeoError::InvalidInput(_))
    }

    /// Returns true if repeating the call later may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GeoError::UpstreamFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeoError::invalid("latitude must be within -90..90, got 200");
        assert!(err.to_string().contains("latitude"));
        assert!(err.to_string().starts_with("Invalid input"));
    }

    #[test]
    fn test_error_classification() {
        assert!(GeoError::invalid("x").is_client_error());
        assert!(!GeoError::invalid("x").is_recoverable());
        assert!(GeoError::upstream("timeout").is_recoverable());
        assert!(!GeoError::upstream("timeout").is_client_error());
        assert!(!GeoError::ConfigError("x".into()).is_recoverable());
    }
}
