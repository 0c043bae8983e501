//! Pre-call and post-call hooks.
//!
//! Hooks are observation points around each transport call. They can record metrics,
//! trace calls or count requests, but they can never change a call's outcome: a hook
//! that returns an error, or panics, is logged and ignored.
//!
//! # Examples
//!
//! ```no_run
//! use fbgraph::{error::BoxError, FacebookClient, HookEvent};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), fbgraph::Error> {
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = calls.clone();
//!
//! let client = FacebookClient::builder("token")
//!     .post_hook(move |event: &HookEvent<'_>| -> Result<(), BoxError> {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         tracing::info!(url = %event.url, status = ?event.status, "graph call finished");
//!         Ok(())
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::error::BoxError;
use http::{Method, StatusCode};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Where in the call a hook is being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// Immediately before the transport call.
    Pre,
    /// Immediately after the transport call returned a response.
    Post,
}

/// What a hook gets to see about the call.
///
/// The URL never contains the access token.
#[derive(Debug, Clone, Copy)]
pub struct HookEvent<'a> {
    /// Which extension point is running.
    pub stage: HookStage,
    /// The request method.
    pub method: &'a Method,
    /// The request URL, without the access token.
    pub url: &'a Url,
    /// The response status; `None` for [`HookStage::Pre`].
    pub status: Option<StatusCode>,
    /// Time spent in the transport call; `None` for [`HookStage::Pre`].
    pub latency: Option<Duration>,
}

/// A side-effect callback run around transport calls.
///
/// Any `Fn(&HookEvent<'_>) -> Result<(), BoxError>` closure that is `Send + Sync`
/// implements this trait.
///
/// # Examples
///
/// ```
/// use fbgraph::{Hook, HookEvent};
/// use fbgraph::error::BoxError;
///
/// struct LogCalls;
///
/// impl Hook for LogCalls {
///     fn call(&self, event: &HookEvent<'_>) -> Result<(), BoxError> {
///         println!("{:?} {} {}", event.stage, event.method, event.url);
///         Ok(())
///     }
/// }
/// ```
pub trait Hook: Send + Sync {
    /// Runs the hook.
    ///
    /// An error is logged and discarded by the caller.
    fn call(&self, event: &HookEvent<'_>) -> Result<(), BoxError>;
}

impl<F> Hook for F
where
    F: Fn(&HookEvent<'_>) -> Result<(), BoxError> + Send + Sync,
{
    fn call(&self, event: &HookEvent<'_>) -> Result<(), BoxError> {
        self(event)
    }
}

/// The optional pre/post hook pair held by a client.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) pre: Option<Arc<dyn Hook>>,
    pub(crate) post: Option<Arc<dyn Hook>>,
}

impl Hooks {
    pub(crate) fn run_pre(&self, method: &Method, url: &Url) {
        let event = HookEvent {
            stage: HookStage::Pre,
            method,
            url,
            status: None,
            latency: None,
        };
        run(self.pre.as_deref(), &event);
    }

    pub(crate) fn run_post(
        &self,
        method: &Method,
        url: &Url,
        status: StatusCode,
        latency: Duration,
    ) {
        let event = HookEvent {
            stage: HookStage::Post,
            method,
            url,
            status: Some(status),
            latency: Some(latency),
        };
        run(self.post.as_deref(), &event);
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("pre", &self.pre.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}

/// Runs one hook inside a failure boundary.
fn run(hook: Option<&dyn Hook>, event: &HookEvent<'_>) {
    let Some(hook) = hook else {
        return;
    };

    match panic::catch_unwind(AssertUnwindSafe(|| hook.call(event))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(
                stage = ?event.stage,
                error = %e,
                url = %event.url,
                "Hook failed, ignoring"
            );
        }
        Err(_) => {
            tracing::error!(
                stage = ?event.stage,
                url = %event.url,
                "Hook panicked, ignoring"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn url() -> Url {
        Url::parse("https://graph.facebook.com/me").unwrap()
    }

    #[test]
    fn test_hooks_see_stage_and_status() {
        let pre_seen = Arc::new(AtomicUsize::new(0));
        let post_seen = Arc::new(AtomicUsize::new(0));
        let (pre_clone, post_clone) = (pre_seen.clone(), post_seen.clone());

        let hooks = Hooks {
            pre: Some(Arc::new(move |event: &HookEvent<'_>| -> Result<(), BoxError> {
                assert_eq!(event.stage, HookStage::Pre);
                assert!(event.status.is_none());
                pre_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
            post: Some(Arc::new(move |event: &HookEvent<'_>| -> Result<(), BoxError> {
                assert_eq!(event.stage, HookStage::Post);
                assert_eq!(event.status, Some(StatusCode::NOT_FOUND));
                post_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        };

        hooks.run_pre(&Method::GET, &url());
        hooks.run_post(&Method::GET, &url(), StatusCode::NOT_FOUND, Duration::ZERO);

        assert_eq!(pre_seen.load(Ordering::SeqCst), 1);
        assert_eq!(post_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_hook_is_swallowed() {
        let hooks = Hooks {
            pre: Some(Arc::new(|_: &HookEvent<'_>| -> Result<(), BoxError> {
                Err("boom".into())
            })),
            post: None,
        };

        hooks.run_pre(&Method::POST, &url());
        hooks.run_post(&Method::POST, &url(), StatusCode::OK, Duration::ZERO);
    }

    #[test]
    fn test_panicking_hook_is_swallowed() {
        let hooks = Hooks {
            pre: None,
            post: Some(Arc::new(|_: &HookEvent<'_>| -> Result<(), BoxError> {
                panic!("hook bug")
            })),
        };

        hooks.run_post(&Method::GET, &url(), StatusCode::OK, Duration::ZERO);
    }
}
