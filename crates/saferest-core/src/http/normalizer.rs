//! Error normalization
//!
//! Collapses every [`TransportError`] into one [`RequestError`], whether the
//! server answered with an error status or the request never completed.
//! Normalization is total: it cannot fail.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::http::error::TransportError;
use crate::http::request_error::{RequestError, UNKNOWN_STATUS_TEXT};

/// Message given to failures that carry no response
pub const UNHANDLED_REJECTION: &str = "Unhandled Rejection";

/// Where one server error format keeps its message and code (JSON pointers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorBodyShape {
    pub message: &'static str,
    pub code: &'static str,
}

/// Built-in shapes, in priority order
pub const DEFAULT_ERROR_SHAPES: &[ErrorBodyShape] = &[
    ErrorBodyShape {
        message: "/message",
        code: "/code",
    },
    ErrorBodyShape {
        message: "/error/message",
        code: "/error/code",
    },
    ErrorBodyShape {
        message: "/err/message",
        code: "/err/code",
    },
];

/// Converts transport failures into [`RequestError`]s.
///
/// Message and code are probed independently across the shape table; for
/// each, the first non-empty match wins.
#[derive(Debug, Clone)]
pub struct ErrorNormalizer {
    shapes: Cow<'static, [ErrorBodyShape]>,
}

impl Default for ErrorNormalizer {
    fn default() -> Self {
        Self {
            shapes: Cow::Borrowed(DEFAULT_ERROR_SHAPES),
        }
    }
}

impl ErrorNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe one more body shape, after every shape already registered
    pub fn with_shape(mut self, message: &'static str, code: &'static str) -> Self {
        self.shapes.to_mut().push(ErrorBodyShape { message, code });
        self
    }

    pub fn shapes(&self) -> &[ErrorBodyShape] {
        &self.shapes
    }

    pub fn normalize<C: DeserializeOwned>(&self, failure: &TransportError) -> RequestError<C> {
        let Some(response) = failure.error_response() else {
            let status_text = failure
                .status_text()
                .filter(|text| !text.is_empty())
                .unwrap_or(UNKNOWN_STATUS_TEXT);
            return RequestError::new(failure.status().unwrap_or(0), status_text)
                .with_message(UNHANDLED_REJECTION)
                .without_response();
        };

        let mut error = RequestError::new(response.status, response.status_text);
        if let Some(message) = self.extract_message(response.data) {
            error = error.with_message(message);
        }
        if let Some(code) = self.extract_code(response.data) {
            match decode_code::<C>(&code) {
                Some(code) => error = error.with_code(code),
                None => debug!(
                    code = %code,
                    "error code outside the declared set, leaving it unset"
                ),
            }
        }
        if let Some(stack) = failure.stack() {
            error = error.with_stack(stack);
        }
        error
    }

    fn extract_message(&self, body: &Value) -> Option<String> {
        self.shapes.iter().find_map(|shape| {
            body.pointer(shape.message)
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        })
    }

    fn extract_code(&self, body: &Value) -> Option<String> {
        self.shapes.iter().find_map(|shape| match body.pointer(shape.code)? {
            Value::String(code) if !code.is_empty() => Some(code.clone()),
            Value::Number(code) => Some(code.to_string()),
            _ => None,
        })
    }
}

fn decode_code<C: DeserializeOwned>(code: &str) -> Option<C> {
    serde_json::from_value(Value::String(code.to_string())).ok()
}

/// Normalize with the built-in shapes
pub fn normalize<C: DeserializeOwned>(failure: &TransportError) -> RequestError<C> {
    ErrorNormalizer::default().normalize(failure)
}
