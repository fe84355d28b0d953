// crates/conformance-core/src/core/outcome.rs
// ============================================================================
// Module: Conformance Outcomes
// Description: Resolved responses and transport failures of the request driver.
// Purpose: Separate application-level responses from transport-level failures.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every request resolves either to an [`Outcome`] (the service answered with
//! a tolerated status, whatever it was) or to a [`TransportError`] (the
//! exchange itself failed). Application errors such as 4xx/5xx statuses or a
//! GraphQL `errors[]` array are data inside an [`Outcome`], never failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Failures of the network exchange itself.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - A transport error is never retried by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The service could not be reached (refused, reset, DNS).
    #[error("connection failed: {0}")]
    Connect(String),
    /// The exchange did not complete before the deadline.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The request could not be built (bad URL, header, or method).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// A fixture file could not be opened for streaming.
    #[error("fixture file {path} unreadable: {message}")]
    Fixture {
        /// Fixture file path.
        path: String,
        /// Underlying I/O error.
        message: String,
    },
    /// The service answered with a status outside the declared tolerance.
    #[error("status {0} outside declared tolerance")]
    StatusRejected(u16),
    /// The exchange failed mid-flight (body read, protocol error).
    #[error("protocol failure: {0}")]
    Protocol(String),
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Response body as observed by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Empty body.
    Empty,
    /// Body that parsed as JSON.
    Json(Value),
    /// Any other body, decoded lossily as UTF-8.
    Text(String),
}

impl ResponseBody {
    /// Classifies raw body bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        serde_json::from_slice(bytes)
            .map_or_else(|_| Self::Text(String::from_utf8_lossy(bytes).into_owned()), Self::Json)
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Empty | Self::Text(_) => None,
        }
    }
}

/// Application-level response to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: ResponseBody,
}

impl Outcome {
    /// Creates an outcome.
    #[must_use]
    pub const fn new(status: u16, body: ResponseBody) -> Self {
        Self {
            status,
            body,
        }
    }

    /// Returns the JSON value at `pointer`, if the body is JSON and has it.
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.body.as_json().and_then(|body| body.pointer(pointer))
    }

    /// Returns the messages of a GraphQL `errors[]` array, in order.
    ///
    /// Bodies without an `errors` array yield an empty list.
    #[must_use]
    pub fn graphql_errors(&self) -> Vec<String> {
        self.pointer("/errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .map(|error| {
                        error.get("message").and_then(Value::as_str).unwrap_or_default().to_string()
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
