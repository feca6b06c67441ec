//! Error types for the API client.
//!
//! # Design
//! `TransportError` is what a transport reports alongside (or instead of) a
//! response. `ErrorEnvelope` is what callers receive: every failure path
//! collapses into the same `{error, data, status}` shape, so it serializes
//! exactly like that on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Message used whenever the response body cannot be turned into JSON.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

const UNKNOWN_STATUS: &str = "unknown";

/// Failure reported by a transport.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportError {
    /// The request could not be sent or no response was read.
    #[error("the request failed to be sent: {0}")]
    Request(String),

    /// The server answered with a 4xx or 5xx status.
    #[error("the server responded with status code {0}")]
    Status(u16),
}

/// Status carried by an `ErrorEnvelope`.
///
/// Serializes as the numeric code, or as the string `"unknown"` when the
/// transport never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr", into = "StatusRepr")]
pub enum ResponseStatus {
    Code(u16),
    Unavailable,
}

impl ResponseStatus {
    pub fn code(&self) -> Option<u16> {
        match self {
            ResponseStatus::Code(code) => Some(*code),
            ResponseStatus::Unavailable => None,
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Code(code) => write!(f, "{code}"),
            ResponseStatus::Unavailable => f.write_str(UNKNOWN_STATUS),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u16),
    Text(String),
}

impl From<ResponseStatus> for StatusRepr {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Code(code) => StatusRepr::Code(code),
            ResponseStatus::Unavailable => StatusRepr::Text(UNKNOWN_STATUS.to_string()),
        }
    }
}

impl TryFrom<StatusRepr> for ResponseStatus {
    type Error = String;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(code) => Ok(ResponseStatus::Code(code)),
            StatusRepr::Text(text) if text == UNKNOWN_STATUS => Ok(ResponseStatus::Unavailable),
            StatusRepr::Text(text) => Err(format!("invalid response status: {text}")),
        }
    }
}

/// Normalized rejection returned by every verb on failure.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvelopeRepr")]
#[error("request failed with status {status}: {data}")]
pub struct ErrorEnvelope {
    /// Always `true`; kept so the serialized shape is self-describing.
    pub error: bool,
    /// Parsed response body, or `{"message": "Unknown error"}`.
    pub data: Value,
    pub status: ResponseStatus,
}

#[derive(Deserialize)]
struct EnvelopeRepr {
    error: bool,
    data: Value,
    status: ResponseStatus,
}

impl TryFrom<EnvelopeRepr> for ErrorEnvelope {
    type Error = &'static str;

    fn try_from(repr: EnvelopeRepr) -> Result<Self, Self::Error> {
        if !repr.error {
            return Err("error envelope must have `error: true`");
        }
        Ok(ErrorEnvelope::new(repr.data, repr.status))
    }
}

impl ErrorEnvelope {
    pub fn new(data: Value, status: ResponseStatus) -> Self {
        Self {
            error: true,
            data,
            status,
        }
    }

    /// Envelope for a body that could not be parsed or a missing response.
    pub fn unknown(status: ResponseStatus) -> Self {
        Self::new(json!({ "message": UNKNOWN_ERROR_MESSAGE }), status)
    }

    /// The `message` field of `data`, if the server sent one.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}
