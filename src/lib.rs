//! # fbgraph - a Graph API client
//!
//! fbgraph issues authenticated reads, publishes, batches and structured queries against
//! the Graph API and normalizes every outcome into either a decoded JSON value or one
//! [`Error`]. It is built on top of `reqwest`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fbgraph::{BatchItem, FacebookClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fbgraph::Error> {
//!     let client = FacebookClient::new("EAAG...")?;
//!
//!     // Read an object
//!     let page = client
//!         .get("SproutSocialInc", &[("fields", "likes,talking_about_count")])
//!         .await?;
//!     println!("Likes: {}", page["likes"]);
//!
//!     // Publish
//!     let post = client.post("me/feed", &json!({"message": "Hello"})).await?;
//!     println!("Created {}", post["id"]);
//!
//!     // Batch: every sub-response body comes back decoded
//!     let responses = client
//!         .batch(&[BatchItem::get("me"), BatchItem::get("SproutSocialInc")])
//!         .await?;
//!     println!("First body: {}", responses[0]["body"]);
//!
//!     // Structured query, annotated with the elapsed time
//!     let result = client
//!         .query_client()
//!         .query("SELECT name FROM user WHERE uid = me()")
//!         .await?;
//!     println!("Query took {}s", result["query_time"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure falls into one of three domains, plus local validation:
//!
//! ```no_run
//! use fbgraph::{Error, FacebookClient};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = FacebookClient::new("token")?;
//! match client.get("me", &[]).await {
//!     Ok(me) => println!("Hello {}", me["name"]),
//!     // No response at all: timeout, TLS failure, refused connection
//!     Err(Error::Connection { message, .. }) => eprintln!("connection: {message}"),
//!     // Not 200; the decoded error is never null
//!     Err(Error::Http(payload)) => eprintln!("graph: {:?}", payload.message()),
//!     // 200, but the body was not JSON
//!     Err(Error::Decode { raw_response, .. }) => eprintln!("garbage: {raw_response}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! All events are emitted through `tracing` under the `fbgraph` target. Access tokens are
//! never logged.

pub mod batch;
pub mod classify;
mod client;
pub mod config;
pub mod decode;
pub mod error;
mod executor;
pub mod hooks;
mod query;
pub mod request;
pub mod retry;
mod transport;

pub use batch::{BatchHeader, BatchItem, BatchMethod};
pub use classify::ErrorPayload;
pub use client::{ClientBuilder, FacebookClient};
pub use config::GraphConfig;
pub use error::{Error, Result};
pub use executor::{AccessToken, ACCESS_TOKEN_PARAM};
pub use hooks::{Hook, HookEvent, HookStage};
pub use query::{QueryClient, QUERY_TIME_KEY};
pub use request::{FilePart, RequestSpec};
pub use retry::RetryStrategy;
