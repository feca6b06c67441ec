//! Async JSON API client.
//!
//! # Overview
//! A thin facade over an HTTP transport: `get`, `post`, `put` and `del`
//! resolve to the parsed JSON response body, or fail with an
//! `ErrorEnvelope` of the shape `{error, data, status}`. The only
//! configuration is a base URL and a set of default headers, set with
//! `ApiClient::init`.
//!
//! # Design
//! - `ApiClient` owns its configuration; independent clients never share
//!   state.
//! - Request building (`build_*`) and completion normalization
//!   (`normalize`) are pure, so the I/O boundary is the `Transport` trait
//!   alone.
//! - `ReqwestTransport` is the production transport; tests plug in their
//!   own.
//!
//! ```ignore
//! use api_client::{ApiClient, Headers, ReqwestTransport};
//!
//! let client = ApiClient::new(ReqwestTransport::new());
//! client.init("https://api.example.com", &Headers::new());
//! let user = client.get("/users/1", &Headers::new()).await?;
//! ```

pub mod client;
pub mod completion;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::ApiClient;
pub use completion::{normalize, Completion};
pub use config::ClientConfig;
pub use error::{ErrorEnvelope, ResponseStatus, TransportError};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, Values};
pub use transport::{ReqwestTransport, Transport};
