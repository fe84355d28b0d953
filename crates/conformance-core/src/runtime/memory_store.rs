// crates/conformance-core/src/runtime/memory_store.rs
// ============================================================================
// Module: In-Memory Record Store
// Description: Record store backed by a mutex-protected map.
// Purpose: Provide a deterministic store for tests and offline runs.
// Dependencies: crate::interfaces, async-trait, serde_json
// ============================================================================

//! ## Overview
//! [`InMemoryRecordStore`] holds records keyed by kind and id. Records can be
//! scheduled to become visible only after a number of reads, which models a
//! service that persists mutations asynchronously.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;

use crate::core::Fetched;
use crate::core::RecordId;
use crate::core::RecordKind;
use crate::core::ReconciledRecord;
use crate::interfaces::RecordStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Stored record plus its visibility threshold.
#[derive(Debug, Clone)]
struct Entry {
    /// Top-level record fields.
    fields: Map<String, Value>,
    /// Reads of this key that return not-found before the record shows up.
    hidden_reads: u32,
}

/// Mutable state behind the store lock.
#[derive(Debug, Default)]
struct State {
    /// Records keyed by (collection, id).
    records: BTreeMap<(String, String), Entry>,
    /// Total reads served.
    reads: u64,
}

/// In-memory [`RecordStore`].
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    /// Store state.
    state: Mutex<State>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record that is visible immediately.
    pub fn insert(&self, kind: &RecordKind, id: &RecordId, fields: Map<String, Value>) {
        self.insert_after(kind, id, fields, 0);
    }

    /// Inserts a record that stays hidden for the next `hidden_reads` reads.
    pub fn insert_after(
        &self,
        kind: &RecordKind,
        id: &RecordId,
        fields: Map<String, Value>,
        hidden_reads: u32,
    ) {
        if let Ok(mut state) = self.state.lock() {
            state.records.insert(key(kind, id), Entry {
                fields,
                hidden_reads,
            });
        }
    }

    /// Removes a record.
    pub fn remove(&self, kind: &RecordKind, id: &RecordId) {
        if let Ok(mut state) = self.state.lock() {
            state.records.remove(&key(kind, id));
        }
    }

    /// Returns the number of reads served so far.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.state.lock().map(|state| state.reads).unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(&self, kind: &RecordKind, id: &RecordId) -> Result<Fetched, StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))?;
        state.reads = state.reads.saturating_add(1);
        let Some(entry) = state.records.get_mut(&key(kind, id)) else {
            return Ok(Fetched::NotFound);
        };
        if entry.hidden_reads > 0 {
            entry.hidden_reads -= 1;
            return Ok(Fetched::NotFound);
        }
        Ok(Fetched::Found(ReconciledRecord::new(kind.clone(), id.clone(), entry.fields.clone())))
    }
}

/// Builds the map key for a record.
fn key(kind: &RecordKind, id: &RecordId) -> (String, String) {
    (kind.collection().to_string(), id.as_str().to_string())
}
