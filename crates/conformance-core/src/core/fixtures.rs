// crates/conformance-core/src/core/fixtures.rs
// ============================================================================
// Module: Conformance Fixtures
// Description: Named values captured during setup and placeholder resolution.
// Purpose: Let later steps reference artifacts created by earlier requests.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Fixtures are opaque values (usually identifiers) captured from setup
//! responses. Steps refer to them with `${name}` placeholders inside paths,
//! form values, GraphQL variables and record ids.
//! Invariants:
//! - A JSON string that is exactly `${name}` is replaced by the fixture value
//!   with its JSON type preserved.
//! - Placeholders embedded in longer strings are replaced by the fixture text.
//! - Unknown fixture names fail resolution; nothing is silently left in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Opening marker of a fixture placeholder.
const PLACEHOLDER_OPEN: &str = "${";
/// Closing marker of a fixture placeholder.
const PLACEHOLDER_CLOSE: char = '}';

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while resolving fixture placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// A placeholder references a fixture that was never captured.
    #[error("fixture {0} is not available")]
    Missing(String),
    /// A placeholder is opened but never closed.
    #[error("unterminated fixture placeholder in {0}")]
    Unterminated(String),
}

// ============================================================================
// SECTION: Fixture Set
// ============================================================================

/// Named fixture values shared by the scenarios of a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixtures {
    /// Captured values keyed by fixture name.
    values: BTreeMap<String, Value>,
}

impl Fixtures {
    /// Creates an empty fixture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fixture value, replacing any earlier capture with that name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Returns the fixture value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the number of captured fixtures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no fixture has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves every placeholder in a string template.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when a placeholder is unterminated or names an
    /// unknown fixture.
    pub fn resolve_str(&self, template: &str) -> Result<String, FixtureError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + PLACEHOLDER_OPEN.len()..];
            let end = after
                .find(PLACEHOLDER_CLOSE)
                .ok_or_else(|| FixtureError::Unterminated(template.to_string()))?;
            out.push_str(&self.text(&after[..end])?);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Resolves placeholders throughout a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when any embedded placeholder cannot resolve.
    pub fn resolve_value(&self, template: &Value) -> Result<Value, FixtureError> {
        match template {
            Value::String(text) => {
                if let Some(name) = whole_placeholder(text) {
                    return self
                        .get(name)
                        .cloned()
                        .ok_or_else(|| FixtureError::Missing(name.to_string()));
                }
                self.resolve_str(text).map(Value::String)
            }
            Value::Array(items) => {
                let items = items.iter().map(|item| self.resolve_value(item));
                items.collect::<Result<_, _>>().map(Value::Array)
            }
            Value::Object(fields) => {
                let mut resolved = Map::with_capacity(fields.len());
                for (key, value) in fields {
                    resolved.insert(key.clone(), self.resolve_value(value)?);
                }
                Ok(Value::Object(resolved))
            }
            other => Ok(other.clone()),
        }
    }

    /// Returns the textual form of a fixture for string interpolation.
    fn text(&self, name: &str) -> Result<String, FixtureError> {
        match self.get(name) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(FixtureError::Missing(name.to_string())),
        }
    }
}

/// Returns the fixture name when `text` is exactly one placeholder.
fn whole_placeholder(text: &str) -> Option<&str> {
    let name = text.strip_prefix(PLACEHOLDER_OPEN)?.strip_suffix(PLACEHOLDER_CLOSE)?;
    if name.contains(PLACEHOLDER_CLOSE) || name.contains(PLACEHOLDER_OPEN) {
        return None;
    }
    Some(name)
}

// ============================================================================
// SECTION: Captures
// ============================================================================

/// Rule extracting a fixture from a setup response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Capture {
    /// Captures the value found at a JSON pointer.
    Pointer {
        /// Fixture name to store the value under.
        name: String,
        /// JSON pointer into the response body.
        pointer: String,
    },
    /// Captures the length of the array found at a JSON pointer.
    Length {
        /// Fixture name to store the length under.
        name: String,
        /// JSON pointer to an array in the response body.
        pointer: String,
    },
    /// Captures `field` of every element of an array, as an array.
    Values {
        /// Fixture name to store the values under.
        name: String,
        /// JSON pointer to an array in the response body.
        pointer: String,
        /// Element field to collect.
        field: String,
    },
    /// Captures `field` of the first element whose value is not listed in
    /// the `known` fixture.
    Fresh {
        /// Fixture name to store the value under.
        name: String,
        /// JSON pointer to an array in the response body.
        pointer: String,
        /// Element field to read.
        field: String,
        /// Fixture holding the values seen before, as an array.
        known: String,
    },
}

impl Capture {
    /// Creates a pointer capture.
    #[must_use]
    pub fn pointer(name: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::Pointer {
            name: name.into(),
            pointer: pointer.into(),
        }
    }

    /// Creates an array-length capture.
    #[must_use]
    pub fn length(name: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self::Length {
            name: name.into(),
            pointer: pointer.into(),
        }
    }

    /// Creates a capture collecting `field` from every array element.
    #[must_use]
    pub fn values(
        name: impl Into<String>,
        pointer: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::Values {
            name: name.into(),
            pointer: pointer.into(),
            field: field.into(),
        }
    }

    /// Creates a capture of the first `field` value missing from `known`.
    #[must_use]
    pub fn fresh(
        name: impl Into<String>,
        pointer: impl Into<String>,
        field: impl Into<String>,
        known: impl Into<String>,
    ) -> Self {
        Self::Fresh {
            name: name.into(),
            pointer: pointer.into(),
            field: field.into(),
            known: known.into(),
        }
    }

    /// Returns the fixture name this capture fills.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Pointer {
                name, ..
            }
            | Self::Length {
                name, ..
            }
            | Self::Values {
                name, ..
            }
            | Self::Fresh {
                name, ..
            } => name,
        }
    }

    /// Extracts the captured value, or `None` when the body lacks it.
    ///
    /// A pointer that resolves to `null` counts as absent. A fresh capture
    /// with no unseen element, or whose `known` fixture is not an array,
    /// is absent too.
    #[must_use]
    pub fn extract(&self, body: &Value, fixtures: &Fixtures) -> Option<Value> {
        match self {
            Self::Pointer {
                pointer, ..
            } => body.pointer(pointer).filter(|value| !value.is_null()).cloned(),
            Self::Length {
                pointer, ..
            } => {
                let items = body.pointer(pointer).and_then(Value::as_array)?;
                Some(Value::from(items.len()))
            }
            Self::Values {
                pointer,
                field,
                ..
            } => body
                .pointer(pointer)
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(|item| item.get(field)).cloned().collect()),
            Self::Fresh {
                pointer,
                field,
                known,
                ..
            } => {
                let known = fixtures.get(known)?.as_array()?;
                body.pointer(pointer)?
                    .as_array()?
                    .iter()
                    .filter_map(|item| item.get(field))
                    .find(|value| !value.is_null() && !known.contains(value))
                    .cloned()
            }
        }
    }
}
