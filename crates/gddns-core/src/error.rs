//! Error types for the update client
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for update operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the update client
#[derive(Error, Debug)]
pub enum Error {
    /// Network-related errors (connectivity, DNS, timeout, unexpected HTTP status)
    #[error("network error: {0}")]
    Network(String),

    /// Malformed response body where a well-formed one was expected
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Configuration errors (invalid or missing request fields)
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider-specific error
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
