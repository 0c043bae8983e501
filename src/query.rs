//! Structured queries against the query endpoint.

use crate::{
    client::{ClientBuilder, ClientInner},
    executor::AccessToken,
    request::RequestSpec,
    Error, Result,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// The only response format the query endpoint is asked for.
pub const RESPONSE_FORMAT: &str = "json";

/// The key under which elapsed query time is injected into results.
pub const QUERY_TIME_KEY: &str = "query_time";

/// A client for the structured-query endpoint.
///
/// Results are the decoded response object plus a `query_time` field holding the
/// wall-clock seconds the call took.
///
/// # Examples
///
/// ```no_run
/// use fbgraph::QueryClient;
///
/// # async fn example() -> Result<(), fbgraph::Error> {
/// let client = QueryClient::new("token")?;
/// let result = client
///     .query("SELECT uid, name FROM user WHERE uid = me()")
///     .await?;
///
/// println!("{} rows in {}s", result["data"].as_array().map_or(0, |d| d.len()), result["query_time"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QueryClient {
    inner: Arc<ClientInner>,
}

impl QueryClient {
    /// Creates a query client with default configuration.
    pub fn new(token: impl Into<AccessToken>) -> Result<Self> {
        Self::builder(token).build_query_client()
    }

    /// Creates a builder; finish it with [`ClientBuilder::build_query_client`].
    pub fn builder(token: impl Into<AccessToken>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    pub(crate) fn from_inner(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Runs one query and returns its result with `query_time` injected.
    ///
    /// # Errors
    ///
    /// Fails like any other call: [`Error::Connection`], [`Error::Http`] or
    /// [`Error::Decode`]. A result that is not a JSON object is reported as
    /// [`Error::Decode`] since there is nowhere to put `query_time`. An empty query
    /// string is rejected with [`Error::Validation`].
    pub async fn query(&self, query: &str) -> Result<Value> {
        if query.trim().is_empty() {
            return Err(Error::Validation("query must not be empty".to_string()));
        }

        let executor = &self.inner.executor;
        let spec = RequestSpec::get(executor.config.query_url.as_str())
            .with_query_param("q", query)
            .with_query_param("format", RESPONSE_FORMAT);

        let start_time = Instant::now();
        let mut result = executor.execute(spec, &self.inner.token).await?;
        let query_time = start_time.elapsed().as_secs_f64();

        match result.as_object_mut() {
            Some(fields) => {
                fields.insert(QUERY_TIME_KEY.to_string(), json!(query_time));
            }
            None => {
                return Err(Error::decode(
                    result.to_string(),
                    "expected a JSON object from the query endpoint",
                ));
            }
        }

        tracing::debug!(query_time = query_time, "Query completed");
        Ok(result)
    }
}
