//! Error types surfaced by the request transport.
//!
//! # Design
//! Every failure a caller can observe is an `ApiError`: a message, a status,
//! and an optional machine-readable code. Callers branch on `status`:
//!
//! - `0`: no response was received (DNS, connection refused, offline), or
//!   the request could not be built in the first place.
//! - `408`: the client-side timeout elapsed before the call settled.
//! - anything else: the server's HTTP status.
//!
//! `FetchError` is the narrower vocabulary of the network primitive. The
//! transport classifies it into an `ApiError` and decides whether to retry.

use serde::Serialize;
use serde_json::Value;

use crate::http::HttpResponse;

pub const STATUS_NETWORK: u16 = 0;
pub const STATUS_TIMEOUT: u16 = 408;
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

pub const TIMEOUT_MESSAGE: &str = "Request timed out";
pub const NETWORK_FALLBACK_MESSAGE: &str = "Network error";

pub const CODE_INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const CODE_ENCODE_ERROR: &str = "ENCODE_ERROR";
pub const CODE_INVALID_RESPONSE_BODY: &str = "INVALID_RESPONSE_BODY";

/// The normalized failure returned by every transport call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// A transport-level failure: no response was received.
    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::new(NETWORK_FALLBACK_MESSAGE, STATUS_NETWORK)
        } else {
            Self::new(message, STATUS_NETWORK)
        }
    }

    pub fn timeout() -> Self {
        Self::new(TIMEOUT_MESSAGE, STATUS_TIMEOUT)
    }

    /// The request was rejected before anything was sent.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(message, STATUS_NETWORK).with_code(CODE_INVALID_REQUEST)
    }

    /// A request payload could not be serialized to JSON.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(message, STATUS_NETWORK).with_code(CODE_ENCODE_ERROR)
    }

    /// A success response whose body does not match the expected shape.
    pub fn invalid_body(status: u16, message: impl Into<String>) -> Self {
        Self::new(format!("Invalid response body: {}", message.into()), status)
            .with_code(CODE_INVALID_RESPONSE_BODY)
    }

    /// Normalize a non-2xx response.
    ///
    /// The body is read as JSON for `message` and `code`. A body that is
    /// not JSON falls back to the status text.
    pub fn from_response(response: &HttpResponse) -> Self {
        let (message, code) = match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => (
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                body.get("code").and_then(code_as_string),
            ),
            Err(_) => (Some(response.status_text.clone()), None),
        };
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed: {}", response.status));
        Self {
            message,
            status: response.status,
            code,
        }
    }

    /// 5xx and 429 are transient; everything else is permanent.
    pub fn is_retryable(&self) -> bool {
        is_retryable_status(self.status)
    }

    pub fn is_timeout(&self) -> bool {
        self.status == STATUS_TIMEOUT
    }

    pub fn is_network(&self) -> bool {
        self.status == STATUS_NETWORK
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status >= 500 || status == STATUS_TOO_MANY_REQUESTS
}

fn code_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Failures reported by a `Fetch` implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The call never produced a response.
    #[error("{0}")]
    Connection(String),

    /// The call observed its cancellation token and gave up.
    #[error("request cancelled")]
    Cancelled,

    /// Already normalized upstream; returned to the caller as-is.
    #[error(transparent)]
    Api(#[from] ApiError),
}
