//! Classification of non-200 responses into structured error payloads.
//!
//! The Graph API reports failures as `{"error": {"message", "type", "code", ...}}`. Bodies
//! that do not decode (proxies, load balancers, outages) are replaced by the fixed
//! [`unknown_error`] object so callers can always read `decoded["error"]["message"]`.

use http::StatusCode;
use serde_json::{json, Value};
use std::fmt;

/// Message carried by the fallback error object.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error.";

/// Type carried by the fallback error object.
pub const UNKNOWN_ERROR_TYPE: &str = "Unknown";

/// Returns the fallback error object used when an error body is not JSON.
///
/// ```
/// use serde_json::json;
///
/// assert_eq!(
///     fbgraph::classify::unknown_error(),
///     json!({"error": {"message": "Unknown error.", "type": "Unknown", "code": null}})
/// );
/// ```
pub fn unknown_error() -> Value {
    json!({
        "error": {
            "message": UNKNOWN_ERROR_MESSAGE,
            "type": UNKNOWN_ERROR_TYPE,
            "code": null,
        }
    })
}

/// A classified failure response.
///
/// `decoded` is never `null`: it holds either whatever JSON the server sent or
/// [`unknown_error`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPayload {
    /// The HTTP status, when the payload came from an HTTP response.
    pub code: Option<StatusCode>,
    /// The raw response body.
    pub body: String,
    /// The decoded body, or the fallback error object.
    pub decoded: Value,
}

impl ErrorPayload {
    fn error_field(&self, key: &str) -> Option<&Value> {
        self.decoded.get("error")?.get(key)
    }

    /// The remote `error.message`, if present and a string.
    pub fn message(&self) -> Option<&str> {
        self.error_field("message")?.as_str()
    }

    /// The remote `error.type` (e.g. `OAuthException`).
    pub fn error_type(&self) -> Option<&str> {
        self.error_field("type")?.as_str()
    }

    /// The remote `error.code`, distinct from the HTTP status.
    pub fn error_code(&self) -> Option<i64> {
        self.error_field("code")?.as_i64()
    }

    /// The remote `error.error_subcode`.
    pub fn error_subcode(&self) -> Option<i64> {
        self.error_field("error_subcode")?.as_i64()
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "HTTP error {}: {}", code.as_u16(), self.body),
            None => write!(f, "HTTP error: {}", self.body),
        }
    }
}

impl std::error::Error for ErrorPayload {}

/// Builds an [`ErrorPayload`] from a failed response.
///
/// Never fails: undecodable bodies are logged and replaced with [`unknown_error`].
pub fn classify(status: impl Into<Option<StatusCode>>, raw_body: &str) -> ErrorPayload {
    let code = status.into();
    let decoded = match serde_json::from_str::<Value>(raw_body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                status = code.map(|c| c.as_u16()),
                error = %e,
                raw_response = %raw_body,
                "Error body is not JSON, using fallback error object"
            );
            unknown_error()
        }
    };

    ErrorPayload {
        code,
        body: raw_body.to_string(),
        decoded,
    }
}
