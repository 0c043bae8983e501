//! Request specifications.

use crate::{Error, Result};
use http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A binary payload attached to a publish call.
///
/// Any request carrying at least one file is sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// The raw bytes of the file.
    pub bytes: Vec<u8>,
    /// The file name reported in the multipart header.
    pub file_name: Option<String>,
    /// The MIME type, e.g. `image/jpeg`.
    pub mime: Option<String>,
}

impl FilePart {
    /// Creates a file part from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            mime: None,
        }
    }

    /// Sets the file name.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the MIME type.
    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Everything needed to make one Graph API call.
///
/// A `RequestSpec` is built fresh for every call; nothing in it is shared between calls.
/// The access token is not part of the spec: it is injected by the client at send time.
///
/// # Examples
///
/// ```
/// use fbgraph::RequestSpec;
/// use serde_json::json;
///
/// let spec = RequestSpec::post("me/feed")
///     .with_body(&json!({"message": "hello"}))
///     .unwrap();
/// assert_eq!(spec.body_params["message"], "hello");
///
/// // Publish payloads must be JSON objects.
/// assert!(RequestSpec::post("me/feed").with_body(&"hello").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// GET or POST.
    pub method: Method,

    /// A path relative to the Graph endpoint (`"me"`, `"1234/feed"`) or a full URL.
    pub target: String,

    /// Query string parameters.
    pub query_params: HashMap<String, String>,

    /// Form or multipart body fields. Non-string values are sent JSON-encoded.
    pub body_params: Map<String, Value>,

    /// Attached binary payloads keyed by field name.
    pub files: HashMap<String, FilePart>,
}

impl RequestSpec {
    /// Creates a new `RequestSpec` with the given method and target.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            query_params: HashMap::new(),
            body_params: Map::new(),
            files: HashMap::new(),
        }
    }

    /// Creates a GET spec.
    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    /// Creates a POST spec.
    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::POST, target)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Adds multiple query parameters to the request.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query_params.extend(params);
        self
    }

    /// Merges a serializable body into the body parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `body` does not serialize to a JSON object.
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body_params.extend(body_map(body)?);
        Ok(self)
    }

    /// Attaches a file under the given field name.
    pub fn with_file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.files.insert(name.into(), file);
        self
    }

    /// Checks the local preconditions of a call.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(Error::Validation("request target must not be empty".to_string()));
        }
        if self.method != Method::GET && self.method != Method::POST {
            return Err(Error::Validation(format!(
                "unsupported method {}, only GET and POST are allowed",
                self.method
            )));
        }
        if self.method == Method::GET && (!self.body_params.is_empty() || !self.files.is_empty())
        {
            return Err(Error::Validation(
                "GET requests cannot carry body parameters or files".to_string(),
            ));
        }
        Ok(())
    }
}

/// Serializes `body` and requires the result to be a JSON object.
pub(crate) fn body_map<B: Serialize + ?Sized>(body: &B) -> Result<Map<String, Value>> {
    let value = serde_json::to_value(body)
        .map_err(|e| Error::Validation(format!("payload could not be serialized: {}", e)))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Validation(format!(
            "payload must be a mapping, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Renders a body value the way the Graph API expects form fields.
pub(crate) fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_body_requires_mapping() {
        assert!(RequestSpec::post("me/feed")
            .with_body(&json!({"message": "hi"}))
            .is_ok());

        for bad in [json!("hi"), json!([1, 2]), json!(null), json!(3)] {
            match RequestSpec::post("me/feed").with_body(&bad) {
                Err(Error::Validation(msg)) => assert!(msg.contains("mapping")),
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_specs_do_not_share_state() {
        let first = RequestSpec::get("me").with_query_param("fields", "id");
        let second = RequestSpec::get("me");

        assert_eq!(first.query_params.len(), 1);
        assert!(second.query_params.is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(RequestSpec::get("me").validate().is_ok());
        assert!(RequestSpec::get("  ").validate().is_err());
        assert!(RequestSpec::new(Method::DELETE, "me").validate().is_err());
        assert!(RequestSpec::get("me")
            .with_file("source", FilePart::new(vec![1, 2, 3]))
            .validate()
            .is_err());
        assert!(RequestSpec::post("me/photos")
            .with_file("source", FilePart::new(vec![1, 2, 3]))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_form_value() {
        assert_eq!(form_value(&json!("plain")), "plain");
        assert_eq!(form_value(&json!(42)), "42");
        assert_eq!(form_value(&json!(true)), "true");
        assert_eq!(form_value(&json!({"a": [1]})), r#"{"a":[1]}"#);
    }
}
