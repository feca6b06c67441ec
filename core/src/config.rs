//! Client configuration: base URL and default headers.

use serde::{Deserialize, Serialize};

use crate::http::Headers;

/// Environment variable read by `ClientConfig::from_env`.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Base URL and headers applied to every request a client issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub default_headers: Headers,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = Headers::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        Self {
            base_url: String::new(),
            default_headers,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Default configuration with the base URL taken from `API_BASE_URL`,
    /// or empty when the variable is unset.
    pub fn from_env() -> Self {
        std::env::var(API_BASE_URL_ENV)
            .map(|base_url| Self::new(&base_url))
            .unwrap_or_default()
    }

    /// Replace the base URL and layer `headers` over the current defaults.
    pub fn init(&mut self, api_url: &str, headers: &Headers) {
        self.base_url = api_url.to_string();
        layer_headers(&mut self.default_headers, headers);
    }

    /// Default headers overridden by `headers`. Neither input is modified.
    pub fn merged_headers(&self, headers: &Headers) -> Headers {
        let mut merged = self.default_headers.clone();
        layer_headers(&mut merged, headers);
        merged
    }

    /// Literal concatenation of the base URL and `endpoint`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

/// Insert `headers` into `target`, replacing entries whose names match
/// ignoring ASCII case. The incoming spelling of the name wins.
fn layer_headers(target: &mut Headers, headers: &Headers) {
    for (name, value) in headers {
        target.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        target.insert(name.clone(), value.clone());
    }
}
