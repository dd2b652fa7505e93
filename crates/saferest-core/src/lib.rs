//! Saferest Core - typed REST client with two call disciplines
//!
//! Each call chooses how failures reach the caller:
//!
//! - **Throwing mode** (default): the call resolves to
//!   `Result<T, TransportError>` and failures are returned unmodified.
//! - **Safe mode** (`.safe()` on the request): the call resolves to a
//!   [`TypesafeResponse`] holding either a normalized [`RequestError`] or the
//!   payload. Nothing is returned as `Err`.
//!
//! # Main Components
//!
//! - **Configuration**: [`ClientConfig`] bound once per client
//! - **Dispatch**: [`Client`] verb methods sharing one dispatch routine
//! - **Error Normalization**: [`normalize`] and [`ErrorNormalizer`]
//! - **Transport**: the [`Transport`] trait and [`ReqwestTransport`]
//!
//! # Example
//!
//! ```no_run
//! use saferest_core::{create_client, Client, ClientConfig, WriteRequest};
//! use serde_json::{json, Value};
//!
//! # async fn example() -> saferest_core::Result<()> {
//! let config = ClientConfig::new().with_base_url("https://api.example.com");
//! let client: Client = create_client(config)?;
//!
//! let (err, created) = client
//!     .post::<Value, _, _>(WriteRequest::new("/todos", json!({"title": "write docs"})).safe())
//!     .await
//!     .into_parts();
//! match (err, created) {
//!     (Some(err), _) => eprintln!("create failed: {}", err.message()),
//!     (None, Some(todo)) => println!("created {}", todo),
//!     (None, None) => unreachable!("exactly one slot is set"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;

pub use config::{BasicAuth, ClientConfig};
pub use error::{Error, Result};
pub use http::{
    create_client, normalize, Client, DispatchMode, ErrorNormalizer, HttpMethod, ReadRequest,
    RequestDescriptor, RequestError, ReqwestTransport, Safe, Throwing, Transport, TransportError,
    TransportResponse, TypesafeResponse, WriteRequest,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
