//! Completion normalization.
//!
//! # Design
//! A transport finishes every request with exactly one `Completion`: an
//! optional transport error and an optional response. `normalize` turns that
//! pair into the value a verb returns. It is pure, so the whole
//! resolve/reject decision table is testable without a transport.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ErrorEnvelope, ResponseStatus, TransportError};
use crate::http::HttpResponse;

/// Outcome of one request as reported by a transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub error: Option<TransportError>,
    #[serde(default)]
    pub response: Option<HttpResponse>,
}

impl Completion {
    pub fn success(response: HttpResponse) -> Self {
        Self {
            error: None,
            response: Some(response),
        }
    }

    pub fn failure(error: TransportError, response: Option<HttpResponse>) -> Self {
        Self {
            error: Some(error),
            response,
        }
    }
}

/// Resolve to the parsed response text, or reject with an `ErrorEnvelope`.
///
/// Text that is not valid JSON always rejects with the "Unknown error"
/// envelope, even when the transport reported success.
pub fn normalize(completion: &Completion) -> Result<Value, ErrorEnvelope> {
    let Some(response) = completion.response.as_ref() else {
        tracing::warn!(error = ?completion.error, "transport completed without a response");
        return Err(ErrorEnvelope::unknown(ResponseStatus::Unavailable));
    };
    let status = ResponseStatus::Code(response.status);

    let data = match parse_text(response.text.as_deref()) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(status = response.status, %err, "response body is not valid JSON");
            return Err(ErrorEnvelope::unknown(status));
        }
    };

    if completion.error.is_some() {
        return Err(ErrorEnvelope::new(data, status));
    }
    Ok(data)
}

/// Absent or empty text is an empty object.
fn parse_text(text: Option<&str>) -> Result<Value, serde_json::Error> {
    match text {
        Some(text) if !text.is_empty() => serde_json::from_str(text),
        _ => Ok(Value::Object(Map::new())),
    }
}
