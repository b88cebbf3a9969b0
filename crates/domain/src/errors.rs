//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TrackVault
///
/// Every failure that crosses the remote-operation layer is expressed as one
/// of these variants. The variant, not the message, decides how the retry
/// layer treats it; see [`TrackVaultError::status_code`] and
/// [`TrackVaultError::is_timeout`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TrackVaultError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Refused by the circuit breaker before any network attempt.
    #[error("Service unhealthy: {0}")]
    ServiceUnhealthy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrackVaultError {
    /// Build an HTTP error from a status code and response text.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http { status, message: message.into() }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error represents a timeout or a cancellation.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Cancelled(_))
    }

    /// Whether the call was rejected by the circuit breaker.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::ServiceUnhealthy(_))
    }

    /// Stable label suitable for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Cancelled(_) => "cancelled",
            Self::Http { .. } => "http",
            Self::ServiceUnhealthy(_) => "service_unhealthy",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for TrackVaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for TrackVault operations
pub type Result<T> = std::result::Result<T, TrackVaultError>;
