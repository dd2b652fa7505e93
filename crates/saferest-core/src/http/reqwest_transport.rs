//! Default transport backed by `reqwest`

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Response};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::error::TransportError;
use crate::http::transport::{RequestDescriptor, Transport, TransportResponse};

/// [`Transport`] over a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Create the connection pool. Only the client-wide timeout is applied
    /// here; everything else is read from each request's effective config.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| Error::HttpClient {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest::Client`
    pub fn from_client(client: ReqwestClient) -> Self {
        Self { client }
    }

    async fn execute(
        &self,
        descriptor: RequestDescriptor,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let RequestDescriptor {
            url,
            method,
            query,
            data,
            config,
        } = descriptor;

        let url = resolve_url(config.base_url.as_deref(), &url)?;
        let mut request = self.client.request(method.into(), url);

        if let Some(query) = &query {
            request = request.query(query);
        }

        if let Some(headers) = &config.headers {
            for (name, value) in headers {
                let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    TransportError::InvalidRequest {
                        message: format!("Invalid header name: {}", name),
                        source: Some(Box::new(e)),
                    }
                })?;
                let header_value = HeaderValue::from_str(value).map_err(|e| {
                    TransportError::InvalidRequest {
                        message: format!("Invalid value for header {}", name),
                        source: Some(Box::new(e)),
                    }
                })?;
                request = request.header(header_name, header_value);
            }
        }

        if let Some(auth) = &config.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        if let Some(data) = &data {
            let bytes = serde_json::to_vec(data)?;
            if let Some(limit) = config.max_body_length {
                if bytes.len() > limit {
                    return Err(TransportError::BodyTooLarge {
                        length: bytes.len(),
                        limit,
                    });
                }
            }
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = request.send().await.map_err(from_reqwest_error)?;
        read_response(response, config.max_content_length).await
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        descriptor: RequestDescriptor,
    ) -> std::result::Result<TransportResponse, TransportError> {
        self.execute(descriptor).await
    }
}

/// Join a request URL onto the base URL.
///
/// Only `scheme://...` and protocol-relative `//host/...` URLs count as
/// absolute; anything else, including paths such as `projects:list`, is
/// joined onto the base. The base's trailing slashes and the path's leading
/// slashes collapse into exactly one `/`.
pub fn resolve_url(base_url: Option<&str>, url: &str) -> std::result::Result<Url, TransportError> {
    if url.starts_with("//") {
        let Some(base) = base_url else {
            return Err(TransportError::invalid_request(format!(
                "Protocol-relative URL {} requires a base URL",
                url
            )));
        };
        return parse_url(base)?.join(url).map_err(|e| TransportError::InvalidRequest {
            message: format!("Invalid URL: {}", url),
            source: Some(Box::new(e)),
        });
    }

    if is_absolute_url(url) {
        return parse_url(url);
    }

    let Some(base) = base_url else {
        return Err(TransportError::invalid_request(format!(
            "Relative URL {} requires a base URL",
            url
        )));
    };

    let joined = if url.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
    };
    parse_url(&joined)
}

/// `scheme://` where the scheme is a letter followed by letters, digits,
/// `+`, `-` or `.`
fn is_absolute_url(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_url(url: &str) -> std::result::Result<Url, TransportError> {
    Url::parse(url).map_err(|e| TransportError::InvalidRequest {
        message: format!("Invalid URL: {}", url),
        source: Some(Box::new(e)),
    })
}

async fn read_response(
    mut response: Response,
    max_content_length: Option<usize>,
) -> std::result::Result<TransportResponse, TransportError> {
    let status = response.status();
    let status_text = reason_phrase(&response);

    if let (Some(limit), Some(declared)) = (max_content_length, response.content_length()) {
        let declared = usize::try_from(declared).unwrap_or(usize::MAX);
        if declared > limit {
            return Err(TransportError::ContentTooLarge {
                length: declared,
                limit,
            });
        }
    }

    // Chunked bodies carry no length up front, so the limit is enforced
    // while reading.
    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(from_reqwest_error)? {
        let length = bytes.len() + chunk.len();
        if let Some(limit) = max_content_length {
            if length > limit {
                return Err(TransportError::ContentTooLarge { length, limit });
            }
        }
        bytes.extend_from_slice(&chunk);
    }

    let data = decode_body(&bytes);
    if status.is_success() {
        debug!(status = status.as_u16(), bytes = bytes.len(), "received response");
        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            data,
        })
    } else {
        warn!(status = status.as_u16(), "server answered with an error status");
        Err(TransportError::response(status.as_u16(), status_text, data))
    }
}

/// The reason phrase the server sent, or the canonical one for the status
fn reason_phrase(response: &Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Empty bodies become `null`, JSON is parsed, anything else is kept as text
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn from_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        return TransportError::InvalidRequest {
            message: error.to_string(),
            source: Some(Box::new(error)),
        };
    }

    let status = error.status();
    TransportError::Network {
        message: error.to_string(),
        status: status.map(|s| s.as_u16()),
        status_text: status.and_then(|s| s.canonical_reason()).map(str::to_string),
        source: Some(Box::new(error)),
    }
}
