//! JSON API client: request building plus the async verb functions.
//!
//! # Design
//! `ApiClient` owns a transport and its `ClientConfig`. Each verb is split
//! into a `build_*` method that produces an `HttpRequest` from the current
//! configuration and an async method that runs the request through the
//! transport and normalizes the completion. The configuration is read once,
//! synchronously, when a verb is invoked; a later `init` never changes a
//! request that has already been built.

use std::fmt;

use parking_lot::RwLock;
use serde_json::Value;

use crate::completion::normalize;
use crate::config::ClientConfig;
use crate::error::ErrorEnvelope;
use crate::http::{Headers, HttpMethod, HttpRequest, Values};
use crate::transport::{ReqwestTransport, Transport};

/// Client for a JSON API rooted at a base URL.
pub struct ApiClient<T> {
    transport: T,
    config: RwLock<ClientConfig>,
}

impl<T> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &*self.config.read())
            .finish_non_exhaustive()
    }
}

impl ApiClient<ReqwestTransport> {
    /// reqwest-backed client configured from `API_BASE_URL`.
    pub fn from_env() -> Self {
        Self::with_config(ReqwestTransport::new(), ClientConfig::from_env())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config: RwLock::new(config),
        }
    }

    /// Set the base URL and layer `headers` over the default headers.
    ///
    /// Can be called again later, e.g. to add an `Authorization` header
    /// after login; headers not named in `headers` are kept.
    pub fn init(&self, api_url: &str, headers: &Headers) {
        self.config.write().init(api_url, headers);
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ClientConfig {
        self.config.read().clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_get(&self, endpoint: &str, headers: &Headers) -> HttpRequest {
        self.build(HttpMethod::Get, endpoint, None, headers)
    }

    pub fn build_post(&self, endpoint: &str, values: &Values, headers: &Headers) -> HttpRequest {
        self.build(HttpMethod::Post, endpoint, Some(values.clone()), headers)
    }

    pub fn build_put(&self, endpoint: &str, values: &Values, headers: &Headers) -> HttpRequest {
        self.build(HttpMethod::Put, endpoint, Some(values.clone()), headers)
    }

    pub fn build_del(&self, endpoint: &str, headers: &Headers) -> HttpRequest {
        self.build(HttpMethod::Delete, endpoint, None, headers)
    }

    pub async fn get(&self, endpoint: &str, headers: &Headers) -> Result<Value, ErrorEnvelope> {
        let request = self.build_get(endpoint, headers);
        self.dispatch(request).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        values: &Values,
        headers: &Headers,
    ) -> Result<Value, ErrorEnvelope> {
        let request = self.build_post(endpoint, values, headers);
        self.dispatch(request).await
    }

    pub async fn put(
        &self,
        endpoint: &str,
        values: &Values,
        headers: &Headers,
    ) -> Result<Value, ErrorEnvelope> {
        let request = self.build_put(endpoint, values, headers);
        self.dispatch(request).await
    }

    pub async fn del(&self, endpoint: &str, headers: &Headers) -> Result<Value, ErrorEnvelope> {
        let request = self.build_del(endpoint, headers);
        self.dispatch(request).await
    }

    fn build(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Values>,
        headers: &Headers,
    ) -> HttpRequest {
        let config = self.config.read();
        HttpRequest {
            method,
            url: config.url_for(endpoint),
            headers: config.merged_headers(headers),
            body,
        }
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<Value, ErrorEnvelope> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(method = method.as_str(), %url, "sending request");

        let completion = self.transport.execute(request).await;
        let result = normalize(&completion);
        match &result {
            Ok(_) => tracing::debug!(method = method.as_str(), %url, "request resolved"),
            Err(envelope) => {
                tracing::debug!(method = method.as_str(), %url, status = %envelope.status, "request rejected")
            }
        }
        result
    }
}
