//! Transport capability
//!
//! The layer that actually speaks HTTP. The client hands it one fully
//! assembled [`RequestDescriptor`] per call and gets back either the decoded
//! response payload or a [`TransportError`].

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::http::error::TransportError;

/// HTTP verbs supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a body
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outbound call, consumed by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Absolute URL, or a path relative to `config.base_url`
    pub url: String,
    pub method: HttpMethod,
    /// Query-string parameters
    pub query: Option<HashMap<String, String>>,
    /// JSON payload, only ever set for POST, PUT and PATCH
    pub data: Option<Value>,
    /// Client defaults with the call's overrides already applied
    pub config: ClientConfig,
}

/// Successful transport response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    /// Decoded response body (`null` when the body was empty)
    pub data: Value,
}

impl TransportResponse {
    /// A `200 OK` response carrying `data`
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            data,
        }
    }
}

/// The capability every client delegates to.
///
/// Implementations own connection handling, redirects, TLS and body
/// (de)serialization. A failed call must resolve to `Err`, with
/// [`TransportError::Response`] whenever the server answered.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<TransportResponse, TransportError>;
}
