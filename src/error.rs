//! Error types for Graph API calls.
//!
//! Every public operation either returns a fully decoded JSON value or one [`Error`].
//! Callers that do not care about the failure domain can treat [`Error`] as a single
//! base type; callers that do can match on its variants.

use crate::classify::ErrorPayload;
use http::StatusCode;

/// Boxed error type accepted from user-supplied hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for Graph API calls.
///
/// # Examples
///
/// ```no_run
/// use fbgraph::{Error, FacebookClient};
///
/// # async fn example() -> Result<(), Error> {
/// let client = FacebookClient::new("token")?;
///
/// match client.get("me", &[]).await {
///     Ok(me) => println!("Hello, {}", me["name"]),
///     Err(Error::Http(payload)) => {
///         eprintln!("Graph error {:?}: {:?}", payload.code, payload.message());
///     }
///     Err(Error::Decode { raw_response, reason }) => {
///         eprintln!("Could not decode {raw_response:?}: {reason}");
///     }
///     Err(Error::Connection { message, .. }) => eprintln!("Network trouble: {message}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The transport never produced an HTTP response (timeout, TLS failure,
    /// refused connection, DNS failure, ...).
    ///
    /// Transient faults may already have been retried by the transport according to
    /// the configured [`RetryStrategy`](crate::RetryStrategy); this is the final outcome.
    #[error("Connection error: {message}")]
    Connection {
        /// The message of the underlying transport fault.
        message: String,
        /// The underlying transport fault.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The server answered with any status other than 200.
    ///
    /// The payload always carries a decoded error object; when the body was not JSON it
    /// holds [`unknown_error`](crate::classify::unknown_error) instead.
    #[error(transparent)]
    Http(ErrorPayload),

    /// The server answered with a success status but the body was not valid JSON.
    #[error("Failed to decode JSON response: {reason} ({raw_response})")]
    Decode {
        /// The raw response body that failed to decode
        raw_response: String,
        /// The parser's failure reason
        reason: String,
    },

    /// A local precondition was violated before any network activity.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration was provided to a builder.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Wraps a transport fault. The URL is dropped first since GET URLs carry the token.
    pub(crate) fn connection(source: reqwest::Error) -> Self {
        let source = source.without_url();
        Error::Connection {
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn decode(raw_response: impl Into<String>, reason: impl ToString) -> Self {
        Error::Decode {
            raw_response: raw_response.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if the error is a transport-level fault that a retry might cure.
    ///
    /// HTTP errors and decode errors are never transient: the server has answered.
    ///
    /// ```
    /// use fbgraph::Error;
    ///
    /// let err = Error::Validation("empty target".to_string());
    /// assert!(!err.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Returns the HTTP status code for [`Error::Http`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http(payload) => payload.code,
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Http(payload) => Some(&payload.body),
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the classified error payload for [`Error::Http`].
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Error::Http(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<ErrorPayload> for Error {
    fn from(payload: ErrorPayload) -> Self {
        Error::Http(payload)
    }
}

/// A specialized `Result` type for Graph API calls.
pub type Result<T> = std::result::Result<T, Error>;
