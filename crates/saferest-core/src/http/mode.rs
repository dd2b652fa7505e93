//! Call disciplines
//!
//! Every request config carries a mode marker type. [`Throwing`] is the
//! default; calling `.safe()` on a request switches it to [`Safe`]. The marker
//! picks the return type of the call at compile time, so a safe call cannot
//! be treated as a bare value and a throwing call cannot be destructured as a
//! tuple.

use serde::de::DeserializeOwned;

use crate::http::error::TransportError;
use crate::http::normalizer::ErrorNormalizer;
use crate::http::result::TypesafeResponse;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Throwing {}
    impl Sealed for super::Safe {}
}

/// How the outcome of a call is handed back to the caller
pub trait DispatchMode: sealed::Sealed + Send + Sync + 'static {
    /// What a call in this mode resolves to, for payload `T` and codes `C`
    type Output<T, C>;

    /// `true` for the mode that never surfaces failures as `Err`
    const SAFE: bool;

    /// Turn the shared outcome into this mode's output
    fn settle<T, C: DeserializeOwned>(
        outcome: Result<T, TransportError>,
        normalizer: &ErrorNormalizer,
    ) -> Self::Output<T, C>;
}

/// Failures are returned as the raw [`TransportError`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Throwing;

/// Failures are normalized and returned inside a [`TypesafeResponse`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Safe;

impl DispatchMode for Throwing {
    type Output<T, C> = Result<T, TransportError>;

    const SAFE: bool = false;

    fn settle<T, C: DeserializeOwned>(
        outcome: Result<T, TransportError>,
        _normalizer: &ErrorNormalizer,
    ) -> Self::Output<T, C> {
        outcome
    }
}

impl DispatchMode for Safe {
    type Output<T, C> = TypesafeResponse<T, C>;

    const SAFE: bool = true;

    fn settle<T, C: DeserializeOwned>(
        outcome: Result<T, TransportError>,
        normalizer: &ErrorNormalizer,
    ) -> Self::Output<T, C> {
        match outcome {
            Ok(data) => TypesafeResponse::from_data(data),
            Err(failure) => TypesafeResponse::from_error(normalizer.normalize(&failure)),
        }
    }
}
