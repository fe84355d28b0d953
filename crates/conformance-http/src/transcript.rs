// crates/conformance-http/src/transcript.rs
// ============================================================================
// Module: HTTP Transcript
// Description: Ordered record of every exchange made by the HTTP driver.
// Purpose: Provide request/response evidence for conformance artifacts.
// Dependencies: conformance-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Entries are appended in send order and carry the request payload summary,
//! the observed status and body, or the transport error. File contents are
//! never copied into the transcript; multipart parts record their paths.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use conformance_core::Outcome;
use conformance_core::Payload;
use conformance_core::Request;
use conformance_core::ResponseBody;
use conformance_core::TransportError;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based send order.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Request payload summary.
    pub request: Value,
    /// Observed status, when a response arrived.
    pub status: Option<u16>,
    /// Observed body, when a response arrived.
    pub response: Value,
    /// Transport error, when the exchange failed.
    pub error: Option<String>,
}

/// Shared, append-only transcript.
#[derive(Debug, Clone, Default)]
pub(crate) struct Transcript {
    /// Recorded entries.
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl Transcript {
    /// Appends an exchange.
    pub(crate) fn record(
        &self,
        request: &Request,
        url: &str,
        result: &Result<Outcome, TransportError>,
    ) {
        let Ok(mut guard) = self.entries.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        let (status, response, error) = match result {
            Ok(outcome) => (Some(outcome.status), body_value(&outcome.body), None),
            Err(err) => (None, Value::Null, Some(err.to_string())),
        };
        guard.push(TranscriptEntry {
            sequence,
            method: request.method.as_str().to_string(),
            url: url.to_string(),
            request: payload_value(&request.payload),
            status,
            response,
            error,
        });
    }

    /// Returns a snapshot of the entries.
    pub(crate) fn snapshot(&self) -> Vec<TranscriptEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Summarizes a request payload.
fn payload_value(payload: &Payload) -> Value {
    match payload {
        Payload::None => Value::Null,
        Payload::Json(body) => body.clone(),
        Payload::Form(fields) => {
            let mut map = Map::new();
            for (key, value) in fields {
                map.insert(key.clone(), Value::String(value.clone()));
            }
            json!({ "form": map })
        }
        Payload::Multipart(parts) => {
            let parts: Vec<Value> = parts
                .iter()
                .map(|part| json!({ "field": part.field, "path": part.path.display().to_string() }))
                .collect();
            json!({ "multipart": parts })
        }
    }
}

/// Renders a response body as JSON.
fn body_value(body: &ResponseBody) -> Value {
    match body {
        ResponseBody::Empty => Value::Null,
        ResponseBody::Json(value) => value.clone(),
        ResponseBody::Text(text) => Value::String(text.clone()),
    }
}
