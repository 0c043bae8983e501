//! The Graph API facade.
//!
//! [`FacebookClient`] holds the access token, the hooks and the configuration, and
//! supplies them to every call. Use [`ClientBuilder`] to configure and create clients.

use crate::{
    batch::BatchItem,
    config::{
        graph_path, GraphConfig, DEFAULT_BATCH_LIMIT, DEFAULT_GRAPH_URL, DEFAULT_QUERY_URL,
        DEFAULT_TIMEOUT,
    },
    executor::{AccessToken, Executor},
    hooks::{Hook, Hooks},
    query::QueryClient,
    request::{FilePart, RequestSpec},
    retry::RetryStrategy,
    Error, Result,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A Graph API client.
///
/// The client is cheap to clone and safe to share between tasks: it holds nothing but
/// the token, hooks and configuration, none of which change after construction.
///
/// # Examples
///
/// ```no_run
/// use fbgraph::{BatchItem, FacebookClient};
/// use serde_json::json;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), fbgraph::Error> {
/// let client = FacebookClient::builder("EAAG...")
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// // Read an object
/// let page = client.get("SproutSocialInc", &[("fields", "likes,talking_about_count")]).await?;
/// println!("Likes: {}", page["likes"]);
///
/// // Publish
/// let post = client.post("me/feed", &json!({"message": "Hello"})).await?;
/// println!("Created post {}", post["id"]);
///
/// // Batch
/// let responses = client
///     .batch(&[BatchItem::get("me"), BatchItem::get("me/friends")])
///     .await?;
/// for response in &responses {
///     println!("{} -> {}", response["code"], response["body"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FacebookClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
pub(crate) struct ClientInner {
    pub(crate) executor: Executor,
    pub(crate) token: AccessToken,
}

impl FacebookClient {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the HTTP client cannot be built.
    pub fn new(token: impl Into<AccessToken>) -> Result<Self> {
        Self::builder(token).build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder(token: impl Into<AccessToken>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &GraphConfig {
        &self.inner.executor.config
    }

    /// A query client sharing this client's token, hooks and configuration.
    pub fn query_client(&self) -> QueryClient {
        QueryClient::from_inner(self.inner.clone())
    }

    /// Runs an arbitrary GET or POST spec.
    ///
    /// # Errors
    ///
    /// * [`Error::Validation`] - the request violates a local precondition
    /// * [`Error::Connection`] - no response was received
    /// * [`Error::Http`] - the server answered with a status other than 200
    /// * [`Error::Decode`] - the server answered 200 with a body that is not JSON
    pub async fn execute(&self, spec: RequestSpec) -> Result<Value> {
        self.inner.executor.execute(spec, &self.inner.token).await
    }

    /// Reads an object or connection.
    ///
    /// `target` is a path such as `"me"` or `"1234/feed"`, or a full URL (e.g. a paging
    /// link returned by a previous call).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(client: fbgraph::FacebookClient) -> Result<(), fbgraph::Error> {
    /// let me = client.get("me", &[("fields", "id,name")]).await?;
    /// println!("{}", me["name"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, target: impl Into<String>, params: &[(&str, &str)]) -> Result<Value> {
        let spec = RequestSpec::get(target).with_query_params(
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        self.execute(spec).await
    }

    /// Reads `connection` of `object_id`, or the object itself when `connection` is `None`.
    pub async fn get_connection(
        &self,
        object_id: &str,
        connection: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<Value> {
        self.get(graph_path(object_id, connection), params).await
    }

    /// Publishes `payload` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] without touching the network if `payload` does not
    /// serialize to a JSON object; otherwise fails like [`execute`](Self::execute).
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        target: impl Into<String>,
        payload: &B,
    ) -> Result<Value> {
        let spec = RequestSpec::post(target).with_body(payload)?;
        self.execute(spec).await
    }

    /// Publishes `payload` together with binary attachments as `multipart/form-data`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fbgraph::FilePart;
    /// use serde_json::json;
    ///
    /// # async fn example(client: fbgraph::FacebookClient) -> Result<(), fbgraph::Error> {
    /// let photo = FilePart::new(std::fs::read("cat.jpg").unwrap())
    ///     .file_name("cat.jpg")
    ///     .mime("image/jpeg");
    /// client
    ///     .post_with_files("me/photos", &json!({"caption": "cat"}), [("source", photo)])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn post_with_files<B, K>(
        &self,
        target: impl Into<String>,
        payload: &B,
        files: impl IntoIterator<Item = (K, FilePart)>,
    ) -> Result<Value>
    where
        B: Serialize + ?Sized,
        K: Into<String>,
    {
        let mut spec = RequestSpec::post(target).with_body(payload)?;
        for (name, file) in files {
            spec = spec.with_file(name, file);
        }
        self.execute(spec).await
    }

    /// Sends `items` as a single batch call.
    ///
    /// The result has one entry per sub-response, in order, with each `body` decoded.
    /// A sub-response whose body cannot be decoded gets
    /// [`empty_body`](crate::batch::empty_body) instead; that does not fail the batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty batch or one larger than the configured
    /// limit. Failures of the outer call fail the whole batch.
    pub async fn batch(&self, items: &[BatchItem]) -> Result<Vec<Value>> {
        self.inner.executor.batch(items, &self.inner.token).await
    }
}

/// Builder for configuring and creating a [`FacebookClient`] or [`QueryClient`].
///
/// # Examples
///
/// ```no_run
/// use fbgraph::{ClientBuilder, RetryStrategy};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), fbgraph::Error> {
/// let client = ClientBuilder::new("token")
///     .base_url("https://graph.facebook.com/v20.0")?
///     .timeout(Duration::from_secs(30))
///     .retry_strategy(RetryStrategy::Linear {
///         delay: Duration::from_millis(200),
///         max_retries: 3,
///     })
///     .verify_ssl(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    token: AccessToken,
    graph_url: Option<Url>,
    query_url: Option<Url>,
    timeout: Duration,
    retry_strategy: RetryStrategy,
    verify_ssl: bool,
    batch_limit: usize,
    hooks: Hooks,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new(token: impl Into<AccessToken>) -> Self {
        Self {
            token: token.into(),
            graph_url: None,
            query_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry_strategy: RetryStrategy::default(),
            verify_ssl: true,
            batch_limit: DEFAULT_BATCH_LIMIT,
            hooks: Hooks::default(),
        }
    }

    /// Sets the endpoint for object, publish and batch calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.graph_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the structured-query endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn query_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.query_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the per-attempt timeout. Defaults to 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry strategy for transient transport faults.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Enables or disables TLS certificate verification. Enabled by default.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Sets the largest accepted batch. Defaults to 50.
    pub fn batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }

    /// Sets the hook run immediately before each transport call.
    pub fn pre_hook(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.pre = Some(Arc::new(hook));
        self
    }

    /// Sets the hook run immediately after each transport call that produced a response.
    pub fn post_hook(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.post = Some(Arc::new(hook));
        self
    }

    fn build_inner(self) -> Result<Arc<ClientInner>> {
        if self.batch_limit == 0 {
            return Err(Error::ConfigurationError(
                "batch limit must be at least 1".to_string(),
            ));
        }

        let graph_url = match self.graph_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_GRAPH_URL)?,
        };
        let query_url = match self.query_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_QUERY_URL)?,
        };

        let config = GraphConfig {
            graph_url,
            query_url,
            timeout: self.timeout,
            retry_strategy: self.retry_strategy,
            verify_ssl: self.verify_ssl,
            batch_limit: self.batch_limit,
        };

        Ok(Arc::new(ClientInner {
            executor: Executor::new(config, self.hooks)?,
            token: self.token,
        }))
    }

    /// Builds the configured [`FacebookClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the client configuration is invalid.
    pub fn build(self) -> Result<FacebookClient> {
        Ok(FacebookClient {
            inner: self.build_inner()?,
        })
    }

    /// Builds a [`QueryClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client configuration is invalid.
    pub fn build_query_client(self) -> Result<QueryClient> {
        Ok(QueryClient::from_inner(self.build_inner()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = FacebookClient::new("token").unwrap();
        let config = client.config();

        assert_eq!(config.graph_url.as_str(), "https://graph.facebook.com/");
        assert_eq!(config.query_url.as_str(), "https://graph.facebook.com/fql");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry_strategy.max_retries(), Some(2));
        assert!(config.verify_ssl);
        assert_eq!(config.batch_limit, 50);
    }

    #[test]
    fn test_independent_client_policies() {
        let fast = FacebookClient::builder("a")
            .timeout(Duration::from_secs(5))
            .retry_strategy(RetryStrategy::None)
            .build()
            .unwrap();
        let slow = FacebookClient::new("b").unwrap();

        assert_eq!(fast.config().timeout, Duration::from_secs(5));
        assert_eq!(slow.config().timeout, DEFAULT_TIMEOUT);
        assert_eq!(fast.config().retry_strategy.max_retries(), Some(0));
    }

    #[test]
    fn test_builder_rejects_bad_configuration() {
        assert!(matches!(
            FacebookClient::builder("t").base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            FacebookClient::builder("t").batch_limit(0).build(),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = FacebookClient::new("EAAGsupersecret").unwrap();
        assert!(!format!("{:?}", client).contains("supersecret"));
    }
}
