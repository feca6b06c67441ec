//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The client
//! builds `HttpRequest` values and normalizes `HttpResponse` values; only the
//! `Transport` implementation touches the network. Keeping the data plain
//! makes every step before and after the round-trip testable in isolation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Header name to header value. Keys are compared literally.
pub type Headers = BTreeMap<String, String>;

/// JSON object attached as the body of POST and PUT requests.
pub type Values = Map<String, Value>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An outgoing HTTP request described as plain data.
///
/// Built by `ApiClient::build_*`. `headers` is already the merge of the
/// client's default headers and the per-call headers; `body` is present for
/// POST and PUT only.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Values>,
}

/// The response envelope a transport hands back after a round-trip.
///
/// `text` is the raw body and the only field the client interprets. `body`
/// is whatever the transport managed to decode on its own and is carried
/// along for callers that inspect completions directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub ok: bool,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpResponse {
    /// Response with the given status and raw text body.
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            text: Some(text.into()),
            body: None,
        }
    }

    /// Response with the given status and no body at all.
    pub fn empty(status: u16) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            text: None,
            body: None,
        }
    }
}
