//! Raw transport failures
//!
//! [`TransportError`] is what a throwing-mode call returns, unmodified. Safe
//! mode feeds the same value through [`crate::http::normalize`].

use std::backtrace::{Backtrace, BacktraceStatus};

use serde_json::Value;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure raised by a [`crate::http::Transport`]
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server answered with a non-success status
    #[error("Request failed with status {status} {status_text}")]
    Response {
        status: u16,
        status_text: String,
        /// Decoded error body
        data: Value,
        /// Diagnostic stack captured where the failure was raised
        stack: Option<String>,
    },

    /// The request never produced a response (connect failure, timeout, ...)
    #[error("Network error: {message}")]
    Network {
        message: String,
        status: Option<u16>,
        status_text: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    /// The request could not be built
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Encoded request body is larger than `max_body_length`
    #[error("Request body of {length} bytes exceeds maxBodyLength of {limit}")]
    BodyTooLarge { length: usize, limit: usize },

    /// Response body is larger than `max_content_length`
    #[error("Response content of {length} bytes exceeds maxContentLength of {limit}")]
    ContentTooLarge { length: usize, limit: usize },

    /// Request body encoding or response payload decoding failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Anything a transport could not classify
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Borrowed view of the response attached to a failure
#[derive(Debug, Clone, Copy)]
pub struct ErrorResponse<'a> {
    pub status: u16,
    pub status_text: &'a str,
    pub data: &'a Value,
}

impl TransportError {
    /// Build a response failure, capturing a stack when backtraces are enabled
    pub fn response(status: u16, status_text: impl Into<String>, data: Value) -> Self {
        TransportError::Response {
            status,
            status_text: status_text.into(),
            data,
            stack: capture_stack(),
        }
    }

    /// Build a network failure without status information
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network {
            message: message.into(),
            status: None,
            status_text: None,
            source: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        TransportError::InvalidRequest {
            message: message.into(),
            source: None,
        }
    }

    /// The response the server sent, if it sent one
    pub fn error_response(&self) -> Option<ErrorResponse<'_>> {
        match self {
            TransportError::Response {
                status,
                status_text,
                data,
                ..
            } => Some(ErrorResponse {
                status: *status,
                status_text,
                data,
            }),
            _ => None,
        }
    }

    /// Status exposed by the failure itself, with or without a response
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Response { status, .. } => Some(*status),
            TransportError::Network { status, .. } => *status,
            _ => None,
        }
    }

    /// Status text exposed by the failure itself, with or without a response
    pub fn status_text(&self) -> Option<&str> {
        match self {
            TransportError::Response { status_text, .. } => Some(status_text),
            TransportError::Network { status_text, .. } => status_text.as_deref(),
            _ => None,
        }
    }

    pub fn stack(&self) -> Option<&str> {
        match self {
            TransportError::Response { stack, .. } => stack.as_deref(),
            _ => None,
        }
    }

    /// Whether the server answered at all
    pub fn has_response(&self) -> bool {
        matches!(self, TransportError::Response { .. })
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Serialization {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Render the current backtrace, or `None` when backtraces are disabled
pub fn capture_stack() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
