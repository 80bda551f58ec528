//! Error types for the Shelf client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Shelf client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Errors surface unchanged
/// from the HTTP layer through the cache layer to callers; nothing here
/// retries or suppresses.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ShelfError {
    /// Network-level failure (unreachable host, timeout, broken connection)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Non-2xx HTTP response, carrying the status code and the server message
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body was not valid JSON where JSON was expected
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Client-side validation failure, raised before any network call
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Multiple errors (e.g. several fields failing validation at once)
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<ShelfError>),
}

impl ShelfError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an Http error from a status code and server message
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a Validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is an Http error
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Check if this is a Parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if this error originated in client-side validation.
    ///
    /// Returns true for:
    /// - `Validation` errors
    /// - `Multiple` where every contained error is a validation error
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::Multiple(errors) => errors.iter().all(ShelfError::is_validation),
            _ => false,
        }
    }

    /// Returns the HTTP status code for `Http` errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ShelfError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A type alias for `Result<T, ShelfError>`.
pub type Result<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status() {
        let err = ShelfError::http(404, "Product not found");
        assert!(err.is_http());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404: Product not found");
    }

    #[test]
    fn test_multiple_validation_is_validation() {
        let err = ShelfError::Multiple(vec![
            ShelfError::validation("name", "Product name is required"),
            ShelfError::validation("price", "Product price must be a positive number"),
        ]);
        assert!(err.is_validation());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_mixed_multiple_is_not_validation() {
        let err = ShelfError::Multiple(vec![
            ShelfError::validation("name", "Product name is required"),
            ShelfError::transport("connection refused"),
        ]);
        assert!(!err.is_validation());
    }

    #[test]
    fn test_serde_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let shelf: ShelfError = err.into();
        assert!(shelf.is_parse());
    }
}
