//! Per-call request configuration
//!
//! [`ReadRequest`] serves the read-like verbs (GET, DELETE) and
//! [`WriteRequest`] the write-like verbs (POST, PUT, PATCH), which also carry
//! a body. Both start in [`Throwing`] mode; `.safe()` moves them to [`Safe`].

use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::Duration;

use crate::config::{BasicAuth, ClientConfig};
use crate::http::mode::{Safe, Throwing};

/// Request for GET and DELETE
#[derive(Debug, Clone)]
pub struct ReadRequest<M = Throwing> {
    pub(crate) url: String,
    pub(crate) query: Option<HashMap<String, String>>,
    pub(crate) overrides: ClientConfig,
    mode: PhantomData<M>,
}

/// Request for POST, PUT and PATCH
#[derive(Debug, Clone)]
pub struct WriteRequest<B, M = Throwing> {
    pub(crate) url: String,
    pub(crate) body: B,
    pub(crate) query: Option<HashMap<String, String>>,
    pub(crate) overrides: ClientConfig,
    mode: PhantomData<M>,
}

impl ReadRequest<Throwing> {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: None,
            overrides: ClientConfig::default(),
            mode: PhantomData,
        }
    }

    /// Return failures as data instead of `Err`
    pub fn safe(self) -> ReadRequest<Safe> {
        ReadRequest {
            url: self.url,
            query: self.query,
            overrides: self.overrides,
            mode: PhantomData,
        }
    }
}

impl<B> WriteRequest<B, Throwing> {
    pub fn new(url: impl Into<String>, body: B) -> Self {
        Self {
            url: url.into(),
            body,
            query: None,
            overrides: ClientConfig::default(),
            mode: PhantomData,
        }
    }

    /// Return failures as data instead of `Err`
    pub fn safe(self) -> WriteRequest<B, Safe> {
        WriteRequest {
            url: self.url,
            body: self.body,
            query: self.query,
            overrides: self.overrides,
            mode: PhantomData,
        }
    }
}

impl<B, M> WriteRequest<B, M> {
    pub fn body(&self) -> &B {
        &self.body
    }
}

/// Builder methods shared by both request kinds
macro_rules! impl_request_options {
    ($($ty:ty => [$($generics:tt)*]),* $(,)?) => {$(
        impl<$($generics)*> $ty {
            pub fn url(&self) -> &str {
                &self.url
            }

            /// Add one query-string parameter
            pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.query
                    .get_or_insert_with(HashMap::new)
                    .insert(name.into(), value.into());
                self
            }

            /// Replace all query-string parameters
            pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
                self.query = Some(query);
                self
            }

            /// Per-call header, overriding a client header of the same name
            pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.overrides = self.overrides.with_header(name, value);
                self
            }

            pub fn basic_auth(
                mut self,
                username: impl Into<String>,
                password: impl Into<String>,
            ) -> Self {
                self.overrides.auth = Some(BasicAuth::new(username, password));
                self
            }

            pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
                self.overrides.base_url = Some(base_url.into());
                self
            }

            pub fn timeout(mut self, timeout: Duration) -> Self {
                self.overrides.timeout = Some(timeout);
                self
            }

            /// Replace every per-call override at once
            pub fn with_overrides(mut self, overrides: ClientConfig) -> Self {
                self.overrides = overrides;
                self
            }

            pub fn overrides(&self) -> &ClientConfig {
                &self.overrides
            }
        }
    )*};
}

impl_request_options!(
    ReadRequest<M> => [M],
    WriteRequest<B, M> => [B, M],
);
