// crates/conformance-core/src/core/record.rs
// ============================================================================
// Module: Reconciled Records
// Description: Snapshots read directly from the backing store.
// Purpose: Carry authoritative field values for read-after-write assertions.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ReconciledRecord`] is a read-only projection of one stored document.
//! It is only ever asserted against and never used to drive requests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::RecordId;
use crate::core::identifiers::RecordKind;

// ============================================================================
// SECTION: Record Types
// ============================================================================

/// Field value as read from a record.
///
/// # Invariants
/// - `Missing` is distinct from an explicit JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// The record stores the field.
    Present(&'a Value),
    /// The record has no such field.
    Missing,
}

/// Snapshot of one stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    /// Kind (collection) the record was read from.
    pub kind: RecordKind,
    /// Record identifier.
    pub id: RecordId,
    /// Top-level document fields.
    pub fields: Map<String, Value>,
}

impl ReconciledRecord {
    /// Creates a record snapshot.
    #[must_use]
    pub const fn new(kind: RecordKind, id: RecordId, fields: Map<String, Value>) -> Self {
        Self {
            kind,
            id,
            fields,
        }
    }

    /// Returns a top-level field.
    #[must_use]
    pub fn field(&self, name: &str) -> FieldValue<'_> {
        self.fields.get(name).map_or(FieldValue::Missing, FieldValue::Present)
    }
}

/// Result of a reconciliation read.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// The record exists.
    Found(ReconciledRecord),
    /// No record with that id exists (deleted or never created).
    NotFound,
}

impl Fetched {
    /// Returns true when the record exists.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}
