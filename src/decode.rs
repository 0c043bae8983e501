//! Decoding of successful response bodies.

use crate::{Error, Result};
use serde_json::Value;

/// Parses a raw response body into a generic JSON value.
///
/// Only syntax is checked; any well-formed JSON document is accepted.
///
/// # Errors
///
/// Returns [`Error::Decode`] carrying the raw body and the parser's reason.
///
/// ```
/// let value = fbgraph::decode::decode(r#"{"id": "4"}"#).unwrap();
/// assert_eq!(value["id"], "4");
///
/// assert!(fbgraph::decode::decode("i am bad json").is_err());
/// ```
pub fn decode(raw_body: &str) -> Result<Value> {
    serde_json::from_str(raw_body).map_err(|e| {
        tracing::error!(
            error = %e,
            raw_response = %raw_body,
            "Failed to decode response"
        );
        Error::decode(raw_body, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_object() {
        let value =
            decode(r#"{"id":"138467959508514","likes":6201,"talking_about_count":309}"#).unwrap();

        assert_eq!(
            value,
            json!({"id": "138467959508514", "likes": 6201, "talking_about_count": 309})
        );
    }

    #[test]
    fn test_decode_scalars_and_arrays() {
        assert_eq!(decode("true").unwrap(), json!(true));
        assert_eq!(decode("[1, {\"a\": null}]").unwrap(), json!([1, {"a": null}]));
    }

    #[test]
    fn test_decode_failure_keeps_raw_body() {
        match decode("i am bad json") {
            Err(Error::Decode {
                raw_response,
                reason,
            }) => {
                assert_eq!(raw_response, "i am bad json");
                assert!(reason.contains("expected"));
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_body_fails() {
        assert!(matches!(decode(""), Err(Error::Decode { .. })));
    }
}
