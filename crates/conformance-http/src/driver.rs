// crates/conformance-http/src/driver.rs
// ============================================================================
// Module: HTTP Request Driver
// Description: reqwest implementation of the harness request driver.
// Purpose: Send resolved requests and return application-level outcomes.
// Dependencies: conformance-core, reqwest, async-trait
// ============================================================================

//! ## Overview
//! Sends one request per call. Statuses inside the request tolerance resolve
//! as [`Outcome`]s; network failures map onto [`TransportError`] variants so
//! the runner can tell them apart from assertion failures.
//! Invariants:
//! - Redirects are not followed.
//! - Bodies larger than `max_response_bytes` fail closed.
//! - Every attempt is recorded in the transcript, failures included.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as _;

use async_trait::async_trait;
use conformance_core::Method;
use conformance_core::Outcome;
use conformance_core::Payload;
use conformance_core::Request;
use conformance_core::RequestDriver;
use conformance_core::ResponseBody;
use conformance_core::TransportError;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::redirect::Policy;

use crate::config::HttpDriverConfig;
use crate::config::HttpDriverError;
use crate::multipart::build_form;
use crate::transcript::Transcript;
use crate::transcript::TranscriptEntry;

// ============================================================================
// SECTION: Driver
// ============================================================================

/// HTTP request driver with transcript capture.
///
/// # Invariants
/// - Clones share the client and the transcript.
#[derive(Debug, Clone)]
pub struct HttpDriver {
    /// Driver settings.
    config: HttpDriverConfig,
    /// HTTP client used for outbound requests.
    client: Client,
    /// Exchange log.
    transcript: Transcript,
}

impl HttpDriver {
    /// Creates a driver for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HttpDriverError::Client`] when the HTTP client cannot be built.
    pub fn new(config: HttpDriverConfig) -> Result<Self, HttpDriverError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| HttpDriverError::Client(err.to_string()))?;
        Ok(Self {
            config,
            client,
            transcript: Transcript::default(),
        })
    }

    /// Returns the driver settings.
    #[must_use]
    pub const fn config(&self) -> &HttpDriverConfig {
        &self.config
    }

    /// Returns a snapshot of the transcript entries.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.snapshot()
    }

    /// Builds the reqwest request, including its body.
    async fn build(
        &self,
        request: &Request,
        url: reqwest::Url,
    ) -> Result<RequestBuilder, TransportError> {
        let mut builder = self.client.request(method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        Ok(match &request.payload {
            Payload::None => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Form(fields) => builder.form(fields),
            Payload::Multipart(parts) => builder.multipart(build_form(parts).await?),
        })
    }

    /// Sends a built request and reads its body under the size limit.
    async fn exchange(
        &self,
        request: &Request,
        url: reqwest::Url,
    ) -> Result<Outcome, TransportError> {
        let builder = self.build(request, url).await?;
        let mut response = builder.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let limit = self.config.max_response_bytes;
        let limit_bytes = u64::try_from(limit).unwrap_or(u64::MAX);
        if response.content_length().is_some_and(|len| len > limit_bytes) {
            return Err(TransportError::Protocol(format!("response exceeds {limit} bytes")));
        }
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_error)? {
            if body.len().saturating_add(chunk.len()) > limit {
                return Err(TransportError::Protocol(format!("response exceeds {limit} bytes")));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(Outcome::new(status, ResponseBody::from_bytes(&body)))
    }
}

#[async_trait]
impl RequestDriver for HttpDriver {
    async fn send(&self, request: &Request) -> Result<Outcome, TransportError> {
        let url = self.config.url_for(&request.path).map_err(TransportError::InvalidRequest)?;
        let result = self.exchange(request, url.clone()).await.and_then(|outcome| {
            if request.tolerance.accepts(outcome.status) {
                Ok(outcome)
            } else {
                Err(TransportError::StatusRejected(outcome.status))
            }
        });
        self.transcript.record(request, url.as_str(), &result);
        result
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a harness method onto reqwest.
fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Classifies a reqwest failure.
fn map_error(err: reqwest::Error) -> TransportError {
    let message = describe(&err);
    if err.is_timeout() {
        TransportError::Timeout(message)
    } else if err.is_connect() {
        TransportError::Connect(message)
    } else if err.is_builder() {
        TransportError::InvalidRequest(message)
    } else {
        TransportError::Protocol(message)
    }
}

/// Renders an error with its source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
