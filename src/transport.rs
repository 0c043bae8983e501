//! The HTTP transport underneath every call.
//!
//! The transport knows nothing about Graph semantics. It sends one prepared request and
//! hands back the status and body text of whatever response finally arrives. Failed
//! connections are retried according to the configured [`RetryStrategy`].
//!
//! Faults are logged and wrapped without their URL: a GET URL carries the token in its
//! query string.

use crate::{
    config::GraphConfig,
    request::FilePart,
    retry::{is_transient, RetryStrategy},
    Error, Result,
};
use http::{Method, StatusCode};
use reqwest::multipart::{Form, Part};
use std::time::{Duration, Instant};
use url::Url;

/// A request with the access token already folded into `query` or `form`.
///
/// `url` itself never carries the token so it is safe to log.
#[derive(Debug)]
pub(crate) struct PreparedRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) form: Vec<(String, String)>,
    pub(crate) files: Vec<(String, FilePart)>,
}

/// The parts of a response the rest of the crate looks at.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) text: String,
    pub(crate) latency: Duration,
    pub(crate) attempts: usize,
}

#[derive(Debug)]
pub(crate) struct Transport {
    http_client: reqwest::Client,
    timeout: Duration,
    retry_strategy: RetryStrategy,
}

impl Transport {
    pub(crate) fn new(config: &GraphConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            timeout: config.timeout,
            retry_strategy: config.retry_strategy.clone(),
        })
    }

    /// Sends the request, retrying faults that happen before anything reaches the server.
    ///
    /// Any response, whatever its status, ends the loop.
    pub(crate) async fn send(&self, request: &PreparedRequest) -> Result<RawResponse> {
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt = attempt,
                "Executing HTTP request"
            );

            let e = match self.send_once(request).await {
                Ok((status, text)) => {
                    let latency = start_time.elapsed();
                    tracing::info!(
                        status = status.as_u16(),
                        latency_ms = latency.as_millis(),
                        attempts = attempt,
                        "Received HTTP response"
                    );
                    return Ok(RawResponse {
                        status,
                        text,
                        latency,
                        attempts: attempt,
                    });
                }
                Err(e) => e.without_url(),
            };

            if e.is_builder() {
                return Err(Error::Validation(format!("could not build request: {}", e)));
            }

            tracing::warn!(
                error = %e,
                attempt = attempt,
                method = %request.method,
                url = %request.url,
                "Transport fault"
            );

            let delay = if is_transient(&e) {
                self.retry_strategy.delay_for_attempt(attempt)
            } else {
                None
            };

            match delay {
                Some(delay) => {
                    tracing::info!(
                        delay_ms = delay.as_millis(),
                        attempt = attempt,
                        "Retrying request after delay"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                None => return Err(Error::connection(e)),
            }
        }
    }

    async fn send_once(
        &self,
        request: &PreparedRequest,
    ) -> std::result::Result<(StatusCode, String), reqwest::Error> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), request.url.clone())
            .timeout(self.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if !request.files.is_empty() {
            builder = builder.multipart(multipart_form(request)?);
        } else if request.method == Method::POST {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

/// Builds a fresh multipart body; forms are consumed on send, so one is built per attempt.
fn multipart_form(request: &PreparedRequest) -> std::result::Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for (key, value) in &request.form {
        form = form.text(key.clone(), value.clone());
    }
    for (name, file) in &request.files {
        let mut part = Part::bytes(file.bytes.clone());
        if let Some(file_name) = &file.file_name {
            part = part.file_name(file_name.clone());
        }
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        form = form.part(name.clone(), part);
    }
    Ok(form)
}
