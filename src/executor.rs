//! The authenticated single-request path.
//!
//! Every public operation funnels through [`Executor::execute`]: validate the request,
//! inject the access token, run the pre-hook, send, run the post-hook, then route the
//! response through [`classify`](crate::classify::classify) or
//! [`decode`](crate::decode::decode).

use crate::{
    classify::classify,
    config::GraphConfig,
    decode::decode,
    hooks::Hooks,
    request::{form_value, RequestSpec},
    transport::{PreparedRequest, Transport},
    Error, Result,
};
use http::{Method, StatusCode};
use serde_json::Value;
use std::fmt;

/// The name of the parameter carrying the access token on every call.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// An opaque Graph API access token.
///
/// The token is never validated locally and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(REDACTED)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[derive(Debug)]
pub(crate) struct Executor {
    pub(crate) config: GraphConfig,
    transport: Transport,
    hooks: Hooks,
}

impl Executor {
    pub(crate) fn new(config: GraphConfig, hooks: Hooks) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            config,
            transport,
            hooks,
        })
    }

    /// Runs one authenticated call and normalizes its outcome.
    pub(crate) async fn execute(&self, spec: RequestSpec, token: &AccessToken) -> Result<Value> {
        spec.validate()?;
        let request = self.prepare(spec, token)?;

        self.hooks.run_pre(&request.method, &request.url);
        let response = self.transport.send(&request).await?;
        self.hooks.run_post(
            &request.method,
            &request.url,
            response.status,
            response.latency,
        );

        if response.status != StatusCode::OK {
            let payload = classify(response.status, &response.text);

            if response.status.is_client_error() {
                tracing::error!(
                    status = response.status.as_u16(),
                    response = %response.text,
                    "Client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = response.status.as_u16(),
                    response = %response.text,
                    "Unexpected status"
                );
            }

            return Err(Error::Http(payload));
        }

        tracing::trace!(
            attempts = response.attempts,
            bytes = response.text.len(),
            "Decoding response body"
        );
        decode(&response.text)
    }

    /// Folds the token into the parameter set and resolves the target.
    fn prepare(&self, spec: RequestSpec, token: &AccessToken) -> Result<PreparedRequest> {
        let url = self.config.resolve(&spec.target)?;

        let mut query: Vec<(String, String)> = spec.query_params.into_iter().collect();
        let mut form: Vec<(String, String)> = spec
            .body_params
            .iter()
            .map(|(key, value)| (key.clone(), form_value(value)))
            .collect();

        let credential = (ACCESS_TOKEN_PARAM.to_string(), token.as_str().to_string());
        if spec.method == Method::GET {
            query.retain(|(key, _)| key != ACCESS_TOKEN_PARAM);
            query.push(credential);
        } else {
            form.retain(|(key, _)| key != ACCESS_TOKEN_PARAM);
            form.push(credential);
        }

        Ok(PreparedRequest {
            method: spec.method,
            url,
            query,
            form,
            files: spec.files.into_iter().collect(),
        })
    }
}
