//! Batched requests.
//!
//! A batch packs several sub-requests into a single POST against the Graph endpoint:
//!
//! ```text
//! batch=[{"method":"GET","relative_url":"me"},...]&access_token=...
//! ```
//!
//! The server answers with an array of `{code, headers, body}` entries in request order.
//! Each `body` arrives as a JSON document encoded inside a JSON string, so it is decoded a
//! second time here. A sub-body that fails that second decode is replaced with
//! [`empty_body`] rather than failing the whole batch.

use crate::{
    executor::{AccessToken, Executor},
    request::{body_map, form_value, RequestSpec},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The method of a batch sub-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BatchMethod {
    /// A read.
    Get,
    /// A publish.
    Post,
}

/// A header attached to one batch sub-request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// One sub-request of a batch.
///
/// # Examples
///
/// ```
/// use fbgraph::BatchItem;
/// use serde_json::json;
///
/// let items = vec![
///     BatchItem::get("me").with_param("name", "get-me"),
///     BatchItem::get("me/friends?limit=50"),
///     BatchItem::post("me/feed", &json!({"message": "hello"})).unwrap(),
/// ];
/// assert_eq!(items[2].body.as_deref(), Some("message=hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// GET or POST.
    pub method: BatchMethod,

    /// The path (and query string) relative to the Graph endpoint.
    pub relative_url: String,

    /// URL-encoded body for POST sub-requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Extra headers for this sub-request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<BatchHeader>>,

    /// Any other per-item field (`name`, `omit_response_on_success`, `depends_on`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem {
    /// Creates a sub-request.
    pub fn new(method: BatchMethod, relative_url: impl Into<String>) -> Self {
        Self {
            method,
            relative_url: relative_url.into(),
            body: None,
            headers: None,
            extra: Map::new(),
        }
    }

    /// Creates a GET sub-request.
    pub fn get(relative_url: impl Into<String>) -> Self {
        Self::new(BatchMethod::Get, relative_url)
    }

    /// Creates a POST sub-request whose body is the URL-encoded form of `body`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `body` does not serialize to a JSON object.
    pub fn post<B: Serialize + ?Sized>(relative_url: impl Into<String>, body: &B) -> Result<Self> {
        let fields = body_map(body)?;
        let mut encoded = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &fields {
            encoded.append_pair(key, &form_value(value));
        }

        let mut item = Self::new(BatchMethod::Post, relative_url);
        item.body = Some(encoded.finish());
        Ok(item)
    }

    /// Adds a header to this sub-request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(Vec::new).push(BatchHeader {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Sets an extra top-level field on this sub-request.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// The body substituted for a sub-response whose body cannot be decoded.
///
/// ```
/// assert_eq!(fbgraph::batch::empty_body(), serde_json::json!({"data": []}));
/// ```
pub fn empty_body() -> Value {
    json!({ "data": [] })
}

/// Decodes the string-encoded `body` of every sub-response in place.
///
/// Entries that are not objects, have no `body`, or whose `body` is already structured
/// are left alone.
pub(crate) fn unwrap_bodies(entries: &mut [Value]) {
    for (index, entry) in entries.iter_mut().enumerate() {
        let Some(body) = entry.as_object_mut().and_then(|fields| fields.get_mut("body")) else {
            continue;
        };
        let Value::String(raw) = &*body else {
            continue;
        };

        let decoded = match serde_json::from_str::<Value>(raw.as_str()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    index = index,
                    error = %e,
                    raw_body = %raw,
                    "Batch sub-response body is not JSON, substituting empty body"
                );
                empty_body()
            }
        };
        *body = decoded;
    }
}

impl Executor {
    /// Sends `items` as one batch call and decodes every sub-response body.
    pub(crate) async fn batch(
        &self,
        items: &[BatchItem],
        token: &AccessToken,
    ) -> Result<Vec<Value>> {
        if items.is_empty() {
            return Err(Error::Validation("batch must contain at least one request".to_string()));
        }
        if items.len() > self.config.batch_limit {
            return Err(Error::Validation(format!(
                "batch of {} requests exceeds the limit of {}",
                items.len(),
                self.config.batch_limit
            )));
        }

        let encoded = serde_json::to_string(items)
            .map_err(|e| Error::Validation(format!("batch could not be serialized: {}", e)))?;
        let spec = RequestSpec::post(self.config.graph_url.as_str())
            .with_body(&json!({ "batch": encoded }))?;

        match self.execute(spec, token).await? {
            Value::Array(mut entries) => {
                if entries.len() != items.len() {
                    tracing::warn!(
                        requested = items.len(),
                        received = entries.len(),
                        "Batch response length differs from request length"
                    );
                }
                unwrap_bodies(&mut entries);
                Ok(entries)
            }
            other => Err(Error::decode(
                other.to_string(),
                "expected a JSON array of batch responses",
            )),
        }
    }
}
