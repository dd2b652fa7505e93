//! Client assembly and request dispatch
//!
//! [`create_client`] binds a [`ClientConfig`] and returns a [`Client`] whose
//! verb methods all funnel into one shared dispatch routine. The request's
//! mode marker decides, at compile time, whether the call resolves to
//! `Result<T, TransportError>` or to a [`TypesafeResponse`].
//!
//! ```no_run
//! use saferest_core::{create_client, Client, ClientConfig, ReadRequest};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! # async fn example() -> saferest_core::Result<()> {
//! let config = ClientConfig::new().with_base_url("https://api.example.com");
//! let client: Client = create_client(config)?;
//!
//! // Throwing mode: failures come back as `Err(TransportError)`.
//! let user: User = client.get(ReadRequest::new("/users/1")).await.expect("request failed");
//!
//! // Safe mode: both outcomes come back as data.
//! let (err, user) = client
//!     .get::<User, _>(ReadRequest::new("/users/1").safe())
//!     .await
//!     .into_parts();
//! if let Some(err) = err {
//!     eprintln!("{} ({})", err.message(), err.status());
//! }
//! # let _ = user;
//! # Ok(())
//! # }
//! ```
//!
//! A safe call cannot be used as a bare value:
//!
//! ```compile_fail
//! # use saferest_core::{create_client, Client, ClientConfig, ReadRequest};
//! # async fn example() -> saferest_core::Result<()> {
//! # let client: Client = create_client(ClientConfig::new())?;
//! let count: u64 = client.get(ReadRequest::new("/count").safe()).await;
//! # Ok(())
//! # }
//! ```
//!
//! Nor can a throwing call be destructured as a safe-mode pair:
//!
//! ```compile_fail
//! # use saferest_core::{create_client, Client, ClientConfig, ReadRequest};
//! # async fn example() -> saferest_core::Result<()> {
//! # let client: Client = create_client(ClientConfig::new())?;
//! let (err, count) = client
//!     .get::<u64, _>(ReadRequest::new("/count"))
//!     .await
//!     .into_parts();
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::builder::{ReadRequest, WriteRequest};
use crate::http::error::TransportError;
use crate::http::mode::DispatchMode;
use crate::http::normalizer::ErrorNormalizer;
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::transport::{HttpMethod, RequestDescriptor, Transport};

/// Verbs that never carry a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMethod {
    Get,
    Delete,
}

/// Verbs that always carry a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    Post,
    Put,
    Patch,
}

impl From<ReadMethod> for HttpMethod {
    fn from(method: ReadMethod) -> Self {
        match method {
            ReadMethod::Get => HttpMethod::Get,
            ReadMethod::Delete => HttpMethod::Delete,
        }
    }
}

impl From<WriteMethod> for HttpMethod {
    fn from(method: WriteMethod) -> Self {
        match method {
            WriteMethod::Post => HttpMethod::Post,
            WriteMethod::Put => HttpMethod::Put,
            WriteMethod::Patch => HttpMethod::Patch,
        }
    }
}

/// HTTP client bound to one [`ClientConfig`].
///
/// `C` is the closed set of error codes the server may report; `T` is the
/// transport. Cloning is cheap and clones share configuration and transport.
pub struct Client<C = String, T = ReqwestTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    normalizer: ErrorNormalizer,
    codes: PhantomData<fn() -> C>,
}

impl<C, T> Clone for Client<C, T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            normalizer: self.normalizer.clone(),
            codes: PhantomData,
        }
    }
}

impl<C, T> std::fmt::Debug for Client<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

/// Create a client backed by [`ReqwestTransport`].
///
/// Accepts a `ClientConfig` or an `Arc<ClientConfig>`; in the latter case
/// [`Client::config`] hands back that very allocation.
pub fn create_client<C>(config: impl Into<Arc<ClientConfig>>) -> Result<Client<C>> {
    let config = config.into();
    config.validate()?;
    let transport = ReqwestTransport::new(&config)?;
    Ok(Client::from_parts(config, transport))
}

impl<C> Client<C, ReqwestTransport> {
    pub fn new(config: impl Into<Arc<ClientConfig>>) -> Result<Self> {
        create_client(config)
    }
}

impl<C, T: Transport> Client<C, T> {
    /// Bind `config` to a caller-supplied transport
    pub fn with_transport(config: impl Into<Arc<ClientConfig>>, transport: T) -> Self {
        Self::from_parts(config.into(), transport)
    }

    fn from_parts(config: Arc<ClientConfig>, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            normalizer: ErrorNormalizer::default(),
            codes: PhantomData,
        }
    }

    /// Probe one more error-body shape when normalizing safe-mode failures
    pub fn with_error_shape(mut self, message: &'static str, code: &'static str) -> Self {
        self.normalizer = self.normalizer.with_shape(message, code);
        self
    }

    /// The configuration bound at creation, unchanged
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<C, T> Client<C, T>
where
    C: DeserializeOwned,
    T: Transport,
{
    pub async fn get<R, M>(&self, request: ReadRequest<M>) -> M::Output<R, C>
    where
        R: DeserializeOwned,
        M: DispatchMode,
    {
        self.dispatch_read(ReadMethod::Get, request).await
    }

    pub async fn delete<R, M>(&self, request: ReadRequest<M>) -> M::Output<R, C>
    where
        R: DeserializeOwned,
        M: DispatchMode,
    {
        self.dispatch_read(ReadMethod::Delete, request).await
    }

    pub async fn post<R, B, M>(&self, request: WriteRequest<B, M>) -> M::Output<R, C>
    where
        R: DeserializeOwned,
        B: Serialize,
        M: DispatchMode,
    {
        self.dispatch_write(WriteMethod::Post, request).await
    }

    pub async fn put<R, B, M>(&self, request: WriteRequest<B, M>) -> M::Output<R, C>
    where
        R: DeserializeOwned,
        B: Serialize,
        M: DispatchMode,
    {
        self.dispatch_write(WriteMethod::Put, request).await
    }

    pub async fn patch<R, B, M>(&self, request: WriteRequest<B, M>) -> M::Output<R, C>
    where
        R: DeserializeOwned,
        B: Serialize,
        M: DispatchMode,
    {
        self.dispatch_write(WriteMethod::Patch, request).await
    }

    /// Dispatch a GET or DELETE
    pub async fn dispatch_read<R, M>(
        &self,
        method: ReadMethod,
        request: ReadRequest<M>,
    ) -> M::Output<R, C>
    where
        R: DeserializeOwned,
        M: DispatchMode,
    {
        let ReadRequest {
            url,
            query,
            overrides,
            ..
        } = request;
        let outcome = self
            .perform(method.into(), url, query, Ok(None), &overrides, M::SAFE)
            .await;
        M::settle(outcome, &self.normalizer)
    }

    /// Dispatch a POST, PUT or PATCH
    pub async fn dispatch_write<R, B, M>(
        &self,
        method: WriteMethod,
        request: WriteRequest<B, M>,
    ) -> M::Output<R, C>
    where
        R: DeserializeOwned,
        B: Serialize,
        M: DispatchMode,
    {
        let WriteRequest {
            url,
            body,
            query,
            overrides,
            ..
        } = request;
        let data = serde_json::to_value(&body).map(Some);
        drop(body);
        let outcome = self
            .perform(method.into(), url, query, data, &overrides, M::SAFE)
            .await;
        M::settle(outcome, &self.normalizer)
    }

    async fn perform<R: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: String,
        query: Option<HashMap<String, String>>,
        data: std::result::Result<Option<Value>, serde_json::Error>,
        overrides: &ClientConfig,
        safe: bool,
    ) -> std::result::Result<R, TransportError> {
        debug!(method = %method, url = %url, safe, "dispatching request");

        let descriptor = RequestDescriptor {
            url,
            method,
            query,
            data: data?,
            config: self.config.merged_with(overrides),
        };

        let response = match self.transport.request(descriptor).await {
            Ok(response) => response,
            Err(failure) => {
                debug!(
                    method = %method,
                    status = failure.status().unwrap_or(0),
                    safe,
                    error = %failure,
                    "request failed"
                );
                return Err(failure);
            }
        };

        debug!(method = %method, status = response.status, "request succeeded");
        Ok(serde_json::from_value(response.data)?)
    }
}
