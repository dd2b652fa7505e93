//! Error types for the saferest core library
//!
//! These errors cover client construction only. Failures of individual
//! requests are reported through [`crate::http::TransportError`] (throwing
//! mode) or [`crate::http::RequestError`] (safe mode).

use thiserror::Error;

/// Main error type for saferest construction-time operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid client configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The underlying HTTP client could not be created
    #[error("HTTP client error: {message}")]
    HttpClient {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }
}
