// crates/conformance-core/src/core/classification.rs
// ============================================================================
// Module: Outcome Classification Table
// Description: Declarative mapping from (operation, field, defect) to outcome.
// Purpose: Keep every expected status and error message in one place.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The [`OutcomeTable`] is the single source of expected application
//! behavior. Steps look their expectations up instead of embedding literals.
//! Invariants:
//! - Each (operation, field, defect) key maps to exactly one expectation.
//! - Sibling entries that disagree are kept as written and surfaced by
//!   [`OutcomeTable::discrepancies`]; the table never normalizes them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::expectation::ExpectedOutcome;

// ============================================================================
// SECTION: Defect Classes
// ============================================================================

/// Class of input defect a request deliberately carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectClass {
    /// Well-formed input.
    Valid,
    /// Required value not provided at all.
    Missing,
    /// Required value explicitly null.
    Null,
    /// Value of the wrong type.
    WrongType,
    /// Empty string or empty payload.
    Empty,
    /// Well-formed reference to an entity that does not exist.
    NonExistent,
    /// Syntactically invalid value or content.
    Malformed,
    /// File in a format the endpoint does not accept.
    UnsupportedFormat,
    /// Archive whose metadata is corrupted.
    Corrupted,
    /// Field not defined by the input type.
    UndefinedField,
}

impl DefectClass {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Missing => "missing",
            Self::Null => "null",
            Self::WrongType => "wrong_type",
            Self::Empty => "empty",
            Self::NonExistent => "non_existent",
            Self::Malformed => "malformed",
            Self::UnsupportedFormat => "unsupported_format",
            Self::Corrupted => "corrupted",
            Self::UndefinedField => "undefined_field",
        }
    }
}

impl fmt::Display for DefectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Table Types
// ============================================================================

/// Errors raised while building or querying an [`OutcomeTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The key already has an expectation.
    #[error("duplicate classification for {0}")]
    Duplicate(OutcomeKey),
    /// The key has no expectation.
    #[error("no classification for {0}")]
    Unclassified(OutcomeKey),
}

/// Key of a classification entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutcomeKey {
    /// Operation name, e.g. `template.export`.
    pub operation: String,
    /// Input field carrying the defect; `None` for whole-request defects.
    pub field: Option<String>,
    /// Defect class.
    pub defect: DefectClass,
}

impl OutcomeKey {
    /// Creates a key.
    #[must_use]
    pub fn new(operation: impl Into<String>, field: Option<&str>, defect: DefectClass) -> Self {
        Self {
            operation: operation.into(),
            field: field.map(str::to_string),
            defect,
        }
    }
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}[{field}]:{}", self.operation, self.defect),
            None => write!(f, "{}:{}", self.operation, self.defect),
        }
    }
}

/// Sibling fields of one operation whose statuses disagree for a defect class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Operation name.
    pub operation: String,
    /// Defect class the siblings share.
    pub defect: DefectClass,
    /// Per-field expected statuses.
    pub statuses: Vec<(String, u16)>,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> =
            self.statuses.iter().map(|(field, status)| format!("{field} -> {status}")).collect();
        write!(f, "{} {}: {}", self.operation, self.defect, entries.join(", "))
    }
}

/// Declarative (operation, field, defect) → expectation table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeTable {
    /// Entries keyed for deterministic iteration.
    entries: BTreeMap<OutcomeKey, ExpectedOutcome>,
}

impl OutcomeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError::Duplicate`] when the key is already set.
    pub fn insert(
        &mut self,
        key: OutcomeKey,
        expected: ExpectedOutcome,
    ) -> Result<(), ClassificationError> {
        if self.entries.contains_key(&key) {
            return Err(ClassificationError::Duplicate(key));
        }
        self.entries.insert(key, expected);
        Ok(())
    }

    /// Adds a status entry.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError::Duplicate`] when the key is already set.
    pub fn status(
        &mut self,
        operation: &str,
        field: Option<&str>,
        defect: DefectClass,
        status: u16,
    ) -> Result<(), ClassificationError> {
        self.insert(OutcomeKey::new(operation, field, defect), ExpectedOutcome::status(status))
    }

    /// Looks an expectation up.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError::Unclassified`] when no entry exists.
    pub fn expect(
        &self,
        operation: &str,
        field: Option<&str>,
        defect: DefectClass,
    ) -> Result<ExpectedOutcome, ClassificationError> {
        let key = OutcomeKey::new(operation, field, defect);
        self.entries.get(&key).cloned().ok_or(ClassificationError::Unclassified(key))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every entry in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&OutcomeKey, &ExpectedOutcome)> {
        self.entries.iter()
    }

    /// Lists sibling fields whose expected statuses disagree.
    ///
    /// Only per-field status entries take part; whole-request entries and
    /// GraphQL expectations are never compared.
    #[must_use]
    pub fn discrepancies(&self) -> Vec<Discrepancy> {
        let mut groups: BTreeMap<(&str, DefectClass), Vec<(String, u16)>> = BTreeMap::new();
        for (key, expected) in &self.entries {
            let (Some(field), ExpectedOutcome::Status {
                status,
            }) = (&key.field, expected)
            else {
                continue;
            };
            let entry = groups.entry((key.operation.as_str(), key.defect)).or_default();
            entry.push((field.clone(), *status));
        }
        groups
            .into_iter()
            .filter(|(_, statuses)| {
                statuses.iter().map(|(_, status)| *status).collect::<BTreeSet<_>>().len() > 1
            })
            .map(|((operation, defect), statuses)| Discrepancy {
                operation: operation.to_string(),
                defect,
                statuses,
            })
            .collect()
    }
}
