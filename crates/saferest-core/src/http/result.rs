//! Two-slot result returned by safe-mode calls

use crate::http::request_error::RequestError;

/// Outcome of a safe-mode call: exactly one of an error or the payload.
///
/// Destructure with [`into_parts`](Self::into_parts) and branch on the error
/// slot, or convert into a plain `Result`.
///
/// ```
/// use saferest_core::TypesafeResponse;
///
/// let response: TypesafeResponse<u32> = TypesafeResponse::from_data(7);
/// let (err, data) = response.into_parts();
/// assert!(err.is_none());
/// assert_eq!(data, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a safe-mode response may hold an error that should be handled"]
pub struct TypesafeResponse<T, C = String> {
    outcome: Result<T, RequestError<C>>,
}

impl<T, C> TypesafeResponse<T, C> {
    pub fn from_data(data: T) -> Self {
        Self { outcome: Ok(data) }
    }

    pub fn from_error(error: RequestError<C>) -> Self {
        Self { outcome: Err(error) }
    }

    /// Split into `(error, data)`; exactly one side is `Some`
    pub fn into_parts(self) -> (Option<RequestError<C>>, Option<T>) {
        match self.outcome {
            Ok(data) => (None, Some(data)),
            Err(error) => (Some(error), None),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&RequestError<C>> {
        self.outcome.as_ref().err()
    }

    pub fn data(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn into_result(self) -> Result<T, RequestError<C>> {
        self.outcome
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TypesafeResponse<U, C> {
        TypesafeResponse {
            outcome: self.outcome.map(f),
        }
    }
}

impl<T, C> From<TypesafeResponse<T, C>> for Result<T, RequestError<C>> {
    fn from(response: TypesafeResponse<T, C>) -> Self {
        response.outcome
    }
}

impl<T, C> From<Result<T, RequestError<C>>> for TypesafeResponse<T, C> {
    fn from(outcome: Result<T, RequestError<C>>) -> Self {
        Self { outcome }
    }
}
