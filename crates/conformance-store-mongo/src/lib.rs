// crates/conformance-store-mongo/src/lib.rs
// ============================================================================
// Module: Conformance Mongo Store
// Description: MongoDB-backed record store for reconciliation reads.
// Purpose: Read authoritative records the service persisted.
// Dependencies: conformance-core, mongodb, serde_json
// ============================================================================

//! ## Overview
//! [`MongoRecordStore`] implements [`conformance_core::RecordStore`] with
//! point reads by `_id`. Record kinds name collections; record ids are
//! `ObjectId` hex strings. Documents are projected into JSON so they compare
//! directly with API responses.
//! Invariants:
//! - The store is read-only.
//! - A missing document is [`conformance_core::Fetched::NotFound`], never an error.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod convert;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use convert::bson_to_json;
pub use convert::document_to_fields;
pub use store::MongoRecordStore;
