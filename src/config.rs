//! Per-client configuration.
//!
//! Every client carries its own [`GraphConfig`], so several clients in one process can
//! talk to different endpoints with different timeouts and retry policies.

use crate::retry::RetryStrategy;
use std::time::Duration;
use url::Url;

/// The Graph API endpoint used for object, publish and batch calls.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";

/// The structured-query endpoint.
pub const DEFAULT_QUERY_URL: &str = "https://graph.facebook.com/fql";

/// The per-call timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The maximum number of sub-requests the Graph API accepts in one batch.
pub const DEFAULT_BATCH_LIMIT: usize = 50;

/// Resolved configuration of a client.
///
/// Built by [`ClientBuilder`](crate::ClientBuilder); read it back with
/// [`FacebookClient::config`](crate::FacebookClient::config).
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Base endpoint for object, publish and batch calls.
    pub graph_url: Url,

    /// Endpoint for structured queries.
    pub query_url: Url,

    /// Timeout applied to each transport attempt.
    pub timeout: Duration,

    /// Retry policy for transient transport faults.
    pub retry_strategy: RetryStrategy,

    /// Whether TLS certificates are verified.
    pub verify_ssl: bool,

    /// Largest accepted batch.
    pub batch_limit: usize,
}

impl GraphConfig {
    /// Resolves `target` against the Graph endpoint.
    ///
    /// Full `http(s)://` URLs are used as-is; anything else is appended to
    /// [`graph_url`](Self::graph_url) as a path.
    pub(crate) fn resolve(&self, target: &str) -> crate::Result<Url> {
        if target.starts_with("https://") || target.starts_with("http://") {
            return Ok(Url::parse(target)?);
        }

        let base = self.graph_url.as_str().trim_end_matches('/');
        let path = target.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

/// Joins an object id and an optional connection into a Graph path.
///
/// ```
/// use fbgraph::config::graph_path;
///
/// assert_eq!(graph_path("SproutSocialInc", None), "SproutSocialInc");
/// assert_eq!(graph_path("537208670", Some("friends")), "537208670/friends");
/// ```
pub fn graph_path(object_id: &str, connection: Option<&str>) -> String {
    match connection {
        Some(connection) if !connection.is_empty() => format!("{}/{}", object_id, connection),
        _ => object_id.to_string(),
    }
}
