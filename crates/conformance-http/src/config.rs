// crates/conformance-http/src/config.rs
// ============================================================================
// Module: HTTP Driver Configuration
// Description: Endpoint, timeout, and size limits for the HTTP driver.
// Purpose: Validate driver settings before any request is sent.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! The endpoint is injected by the caller; nothing here reads the
//! environment.
//! Invariants:
//! - `endpoint` is an absolute `http` or `https` URL.
//! - `timeout_ms` bounds the full request lifecycle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default response size limit in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "conformance-harness/0.1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing an HTTP driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpDriverError {
    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// HTTP driver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpDriverConfig {
    /// Base URL every request path is appended to.
    pub endpoint: Url,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size accepted, in bytes.
    pub max_response_bytes: usize,
    /// User agent string.
    pub user_agent: String,
}

impl HttpDriverConfig {
    /// Parses the endpoint and applies default limits.
    ///
    /// # Errors
    ///
    /// Returns [`HttpDriverError::InvalidEndpoint`] when the endpoint is not
    /// an absolute http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self, HttpDriverError> {
        let invalid = |reason: &str| HttpDriverError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        };
        let parsed = Url::parse(endpoint).map_err(|err| invalid(&err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("host required"));
        }
        Ok(Self {
            endpoint: parsed,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Replaces the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replaces the response size limit.
    #[must_use]
    pub const fn with_max_response_bytes(mut self, max_response_bytes: usize) -> Self {
        self.max_response_bytes = max_response_bytes;
        self
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Joins a request path onto the endpoint, keeping any endpoint prefix.
    ///
    /// # Errors
    ///
    /// Returns the URL parse error message when the joined URL is invalid.
    pub fn url_for(&self, path: &str) -> Result<Url, String> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let separator = if path.starts_with('/') { "" } else { "/" };
        let joined = format!("{base}{separator}{path}");
        Url::parse(&joined).map_err(|err| format!("{joined}: {err}"))
    }
}
