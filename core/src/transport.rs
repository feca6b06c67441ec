//! The transport seam and its reqwest implementation.
//!
//! # Design
//! `Transport` is the only place the client performs I/O. An implementation
//! receives a fully built `HttpRequest` (headers merged, body attached) and
//! must hand back exactly one `Completion`. Failures to dispatch are reported
//! through the completion, never as panics, so the client can normalize them
//! like any other failure.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::completion::Completion;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Completion;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Completion {
        self.as_ref().execute(request).await
    }
}

/// Transport backed by a `reqwest::Client`.
///
/// 4xx and 5xx statuses are reported as `TransportError::Status` together
/// with the response. Anything that prevents a response from being read
/// (invalid URL or header, connection failure) is reported as
/// `TransportError::Request` without a response.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, TLS roots).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn build(&self, request: &HttpRequest) -> Result<reqwest::Request, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        // insert, not append: one value per case-insensitive name
        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| TransportError::Request(format!("invalid header name {name:?}: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| TransportError::Request(format!("invalid value for header {name}: {err}")))?;
            headers.insert(name, value);
        }
        let mut builder = self.http.request(method, request.url.as_str()).headers(headers);
        // `json` keeps a caller supplied content type
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Completion {
        let outgoing = match self.build(&request) {
            Ok(outgoing) => outgoing,
            Err(err) => return Completion::failure(err, None),
        };

        let response = match self.http.execute(outgoing).await {
            Ok(response) => response,
            Err(err) => return Completion::failure(TransportError::Request(err.to_string()), None),
        };

        let status = response.status();
        let mut envelope = HttpResponse::empty(status.as_u16());
        match response.text().await {
            Ok(text) => {
                envelope.body = serde_json::from_str(&text).ok();
                envelope.text = Some(text);
            }
            Err(err) => {
                tracing::warn!(status = status.as_u16(), %err, "failed to read response body");
                return Completion::failure(TransportError::Request(err.to_string()), Some(envelope));
            }
        }

        if status.is_client_error() || status.is_server_error() {
            Completion::failure(TransportError::Status(status.as_u16()), Some(envelope))
        } else {
            Completion::success(envelope)
        }
    }
}
