//! Client configuration
//!
//! A [`ClientConfig`] is bound once when a client is created and is never
//! mutated afterwards. Every request merges the bound configuration with its
//! own per-call overrides, call-site values taking precedence.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Basic-auth credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs.
impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Transport defaults shared by every request issued from one client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Basic-auth credentials sent as `Authorization: Basic ...`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<BasicAuth>,
    /// Base URL that relative request URLs are joined to
    #[serde(default, rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Extra request headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Largest request body, in bytes, the transport will send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_length: Option<usize>,
    /// Largest response body, in bytes, the transport will accept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_content_length: Option<usize>,
    /// Total deadline for a request, handed to the transport untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth::new(username, password));
        self
    }

    /// Add one header, replacing an earlier value for the same name
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_max_body_length(mut self, limit: usize) -> Self {
        self.max_body_length = Some(limit);
        self
    }

    pub fn with_max_content_length(mut self, limit: usize) -> Self {
        self.max_content_length = Some(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns `true` when no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Every field set in `overrides` wins. Header maps are merged by name,
    /// with the override's value kept for names present in both.
    pub fn merged_with(&self, overrides: &ClientConfig) -> ClientConfig {
        let headers = match (&self.headers, &overrides.headers) {
            (None, None) => None,
            (Some(base), None) => Some(base.clone()),
            (None, Some(extra)) => Some(extra.clone()),
            (Some(base), Some(extra)) => {
                let mut merged = base.clone();
                merged.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
                Some(merged)
            }
        };

        ClientConfig {
            auth: overrides.auth.clone().or_else(|| self.auth.clone()),
            base_url: overrides.base_url.clone().or_else(|| self.base_url.clone()),
            headers,
            max_body_length: overrides.max_body_length.or(self.max_body_length),
            max_content_length: overrides.max_content_length.or(self.max_content_length),
            timeout: overrides.timeout.or(self.timeout),
        }
    }

    /// Validate the configuration before it is bound to a client
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            let parsed = Url::parse(base_url).map_err(|e| Error::Configuration {
                message: format!("Invalid base URL: {}", base_url),
                source: Some(anyhow::Error::new(e)),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::configuration(format!(
                    "Unsupported base URL scheme: {}",
                    parsed.scheme()
                )));
            }
        }

        if let Some(headers) = &self.headers {
            for (name, value) in headers {
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::Configuration {
                    message: format!("Invalid header name: {}", name),
                    source: Some(anyhow::Error::new(e)),
                })?;
                HeaderValue::from_str(value).map_err(|e| Error::Configuration {
                    message: format!("Invalid value for header {}", name),
                    source: Some(anyhow::Error::new(e)),
                })?;
            }
        }

        if self.max_body_length == Some(0) {
            return Err(Error::configuration("max_body_length cannot be zero"));
        }
        if self.max_content_length == Some(0) {
            return Err(Error::configuration("max_content_length cannot be zero"));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::configuration("timeout cannot be zero"));
        }

        Ok(())
    }
}
