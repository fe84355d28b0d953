// crates/conformance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Conformance Interfaces
// Description: Backend-agnostic seams for request delivery and record reads.
// Purpose: Define the contracts the runner composes.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! The runner never talks to HTTP or a database directly. It drives a
//! [`RequestDriver`] and reads through a [`RecordStore`]; concrete
//! implementations live in their own crates.
//! Invariants:
//! - Drivers do not log, retry, or mutate fixtures.
//! - Stores are read-only and report absence as [`Fetched::NotFound`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Fetched;
use crate::core::Outcome;
use crate::core::RecordId;
use crate::core::RecordKind;
use crate::core::Request;
use crate::core::TransportError;

// ============================================================================
// SECTION: Request Driver
// ============================================================================

/// Delivers a resolved request to the API under test.
#[async_trait]
pub trait RequestDriver: Send + Sync {
    /// Sends `request` and resolves with the application outcome.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange cannot complete or the
    /// status falls outside the request's tolerance.
    async fn send(&self, request: &Request) -> Result<Outcome, TransportError>;
}

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Backing-store read errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Absence of a record is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or rejected the query.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A stored document could not be projected into a record.
    #[error("store returned undecodable record: {0}")]
    Decode(String),
}

/// Read-only access to authoritative state.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads one record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot answer.
    async fn fetch(&self, kind: &RecordKind, id: &RecordId) -> Result<Fetched, StoreError>;
}
