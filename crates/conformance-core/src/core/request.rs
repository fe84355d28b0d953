// crates/conformance-core/src/core/request.rs
// ============================================================================
// Module: Conformance Requests
// Description: Transport-neutral description of one request to the API under test.
// Purpose: Capture method, target, payload encoding, and status tolerance.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Request`] is a template: its path, form values, JSON body and headers
//! may contain fixture placeholders that are resolved right before sending.
//! Invariants:
//! - File parts are referenced by path and streamed by the driver; the
//!   request never holds file contents.
//! - The status tolerance decides which statuses resolve as outcomes; all
//!   others are transport failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::core::fixtures::FixtureError;
use crate::core::fixtures::Fixtures;

// ============================================================================
// SECTION: Method
// ============================================================================

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
}

impl Method {
    /// Returns the canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Status Tolerance
// ============================================================================

/// Statuses a request treats as resolved outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "limit", rename_all = "snake_case")]
pub enum StatusTolerance {
    /// Any status strictly below the limit resolves.
    Below(u16),
    /// Only 2xx statuses resolve.
    Success,
}

impl StatusTolerance {
    /// Returns true when `status` resolves as an outcome.
    #[must_use]
    pub const fn accepts(self, status: u16) -> bool {
        match self {
            Self::Below(limit) => status < limit,
            Self::Success => status >= 200 && status < 300,
        }
    }
}

impl Default for StatusTolerance {
    fn default() -> Self {
        Self::Below(600)
    }
}

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Named file field of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// Path of the file streamed into the field.
    pub path: PathBuf,
}

/// Encoded request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "body", rename_all = "snake_case")]
pub enum Payload {
    /// No body.
    #[default]
    None,
    /// Structured JSON body.
    Json(Value),
    /// URL-encoded form body, in field order.
    Form(Vec<(String, String)>),
    /// Multipart body of streamed file parts; empty sends an empty form.
    Multipart(Vec<FilePart>),
}

/// Renders a JSON scalar the way query-string encoders do.
///
/// `null` becomes the empty string and booleans become `true` / `false`.
#[must_use]
pub fn form_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Request
// ============================================================================

/// One request against the API under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the configured endpoint, may contain placeholders.
    pub path: String,
    /// Body encoding and content.
    pub payload: Payload,
    /// Extra headers, values may contain placeholders.
    pub headers: Vec<(String, String)>,
    /// Statuses resolved as outcomes.
    pub tolerance: StatusTolerance,
}

impl Request {
    /// Creates a request with no body and the default tolerance.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: Payload::None,
            headers: Vec::new(),
            tolerance: StatusTolerance::default(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Creates a GraphQL-over-HTTP POST carrying `{query, variables}`.
    #[must_use]
    pub fn graphql(path: impl Into<String>, query: &str, variables: Option<Value>) -> Self {
        let body = variables.map_or_else(
            || json!({ "query": query }),
            |variables| json!({ "query": query, "variables": variables }),
        );
        Self::post(path).json(body)
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    /// Sets a URL-encoded form body from string pairs.
    #[must_use]
    pub fn form<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields.into_iter().map(|(key, value)| (key.into(), value.into()));
        self.payload = Payload::Form(fields.collect());
        self
    }

    /// Sets a URL-encoded form body from JSON scalars, see [`form_text`].
    #[must_use]
    pub fn form_values<I, K>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.form(
            fields.into_iter().map(|(key, value)| (Into::<String>::into(key), form_text(&value))),
        )
    }

    /// Sets an empty multipart body.
    #[must_use]
    pub fn empty_multipart(mut self) -> Self {
        self.payload = Payload::Multipart(Vec::new());
        self
    }

    /// Appends a streamed file part, switching the body to multipart.
    #[must_use]
    pub fn file(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let part = FilePart {
            field: field.into(),
            path: path.into(),
        };
        match &mut self.payload {
            Payload::Multipart(parts) => parts.push(part),
            _ => self.payload = Payload::Multipart(vec![part]),
        }
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Overrides the status tolerance.
    #[must_use]
    pub const fn tolerance(mut self, tolerance: StatusTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns a copy with every fixture placeholder resolved.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when a placeholder cannot be resolved.
    pub fn resolve(&self, fixtures: &Fixtures) -> Result<Self, FixtureError> {
        let payload = match &self.payload {
            Payload::None => Payload::None,
            Payload::Json(body) => Payload::Json(fixtures.resolve_value(body)?),
            Payload::Form(fields) => Payload::Form(
                fields
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), fixtures.resolve_str(value)?)))
                    .collect::<Result<_, FixtureError>>()?,
            ),
            Payload::Multipart(parts) => Payload::Multipart(parts.clone()),
        };
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| Ok((name.clone(), fixtures.resolve_str(value)?)))
            .collect::<Result<_, FixtureError>>()?;
        Ok(Self {
            method: self.method,
            path: fixtures.resolve_str(&self.path)?,
            payload,
            headers,
            tolerance: self.tolerance,
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
