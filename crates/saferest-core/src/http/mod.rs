//! Typed HTTP request dispatch
//!
//! This module provides:
//! - Per-call request configs with a throwing/safe mode marker
//! - Shared dispatch for GET, POST, PUT, PATCH and DELETE
//! - Normalization of transport failures into one error shape
//! - A pluggable transport seam with a reqwest-backed default

pub mod builder;
pub mod client;
pub mod error;
pub mod mode;
pub mod normalizer;
pub mod request_error;
pub mod reqwest_transport;
pub mod result;
pub mod transport;

pub use builder::{ReadRequest, WriteRequest};
pub use client::{create_client, Client, ReadMethod, WriteMethod};
pub use error::{ErrorResponse, TransportError};
pub use mode::{DispatchMode, Safe, Throwing};
pub use normalizer::{
    normalize, ErrorBodyShape, ErrorNormalizer, DEFAULT_ERROR_SHAPES, UNHANDLED_REJECTION,
};
pub use request_error::{RequestError, UNKNOWN_STATUS_TEXT};
pub use reqwest_transport::ReqwestTransport;
pub use result::TypesafeResponse;
pub use transport::{HttpMethod, RequestDescriptor, Transport, TransportResponse};
