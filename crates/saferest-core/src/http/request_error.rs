//! Canonical failure value returned by safe-mode calls

use std::fmt;

use serde::Serialize;

/// Status text used when no other text is available
pub const UNKNOWN_STATUS_TEXT: &str = "Unknown Error";

/// One failed request, normalized.
///
/// `message` is never empty: without an explicit message it equals
/// `status_text`, which itself falls back to [`UNKNOWN_STATUS_TEXT`].
///
/// `C` is the caller's closed set of business error codes. It defaults to
/// `String`, which accepts any code.
///
/// ```
/// use saferest_core::RequestError;
///
/// let err: RequestError = RequestError::new(400, "Test Error");
/// assert_eq!(err.message(), "Test Error");
/// assert_eq!(err.status(), 400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestError<C = String> {
    status: u16,
    status_text: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<C>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
    #[serde(skip)]
    explicit_message: bool,
    #[serde(skip)]
    responded: bool,
}

impl<C> RequestError<C> {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        let mut status_text = status_text.into();
        if status_text.is_empty() {
            status_text = UNKNOWN_STATUS_TEXT.to_string();
        }
        Self {
            status,
            message: status_text.clone(),
            status_text,
            code: None,
            stack: None,
            explicit_message: false,
            responded: status != 0,
        }
    }

    /// Mark the failure as one where no response arrived, even if a status
    /// was recorded along the way (a proxy refusal, for instance)
    pub fn without_response(mut self) -> Self {
        self.responded = false;
        self
    }

    /// Set the human-readable message. An empty message is ignored.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.is_empty() {
            self.message = message;
            self.explicit_message = true;
        }
        self
    }

    pub fn with_code(mut self, code: C) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// HTTP status, `0` when no response was received
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&C> {
        self.code.as_ref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// `false` when `message` is the `status_text` fallback
    pub fn has_explicit_message(&self) -> bool {
        self.explicit_message
    }

    /// Whether a response was received
    pub fn has_response(&self) -> bool {
        self.responded
    }
}

impl<C> fmt::Display for RequestError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explicit_message {
            write!(f, "{} {}: {}", self.status, self.status_text, self.message)
        } else {
            write!(f, "{} {}", self.status, self.status_text)
        }
    }
}

impl<C: fmt::Debug> std::error::Error for RequestError<C> {}
