// crates/conformance-core/src/core/identifiers.rs
// ============================================================================
// Module: Conformance Identifiers
// Description: Opaque identifiers for reconciled records and record kinds.
// Purpose: Provide validated, serializable identifiers with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Records in the backing store are addressed by a collection name and a
//! 24-character hexadecimal object identifier. [`RecordId`] enforces the
//! identifier shape at construction so stores never receive malformed keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of a record identifier in hexadecimal characters.
pub const RECORD_ID_LEN: usize = 24;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing a [`RecordId`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordIdError {
    /// The identifier does not have exactly [`RECORD_ID_LEN`] characters.
    #[error("record id must be {RECORD_ID_LEN} hex characters, got {0}")]
    Length(usize),
    /// The identifier contains a non-hexadecimal character.
    #[error("record id contains non-hex character '{0}'")]
    NonHex(char),
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Identifier of a record in the backing store.
///
/// # Invariants
/// - Exactly 24 ASCII hexadecimal characters, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Parses and normalizes a record identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RecordIdError`] when the input is not 24 hex characters.
    pub fn parse(raw: &str) -> Result<Self, RecordIdError> {
        let count = raw.chars().count();
        if count != RECORD_ID_LEN {
            return Err(RecordIdError::Length(count));
        }
        if let Some(bad) = raw.chars().find(|ch| !ch.is_ascii_hexdigit()) {
            return Err(RecordIdError::NonHex(bad));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of record to reconcile, named by its backing-store collection.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKind(String);

impl RecordKind {
    /// Creates a record kind for the named collection.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self(collection.into())
    }

    /// Returns the collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
