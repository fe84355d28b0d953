// crates/conformance-core/src/core/mod.rs
// ============================================================================
// Module: Conformance Core Types
// Description: Data model shared by the driver, reconciler, and runner.
// Purpose: Group requests, outcomes, expectations, fixtures, and records.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Transport-neutral data model of the harness. Nothing in this module
//! performs I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classification;
pub mod expectation;
pub mod fixtures;
pub mod identifiers;
pub mod outcome;
pub mod record;
pub mod request;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use classification::ClassificationError;
pub use classification::DefectClass;
pub use classification::Discrepancy;
pub use classification::OutcomeKey;
pub use classification::OutcomeTable;
pub use expectation::ExpectedLen;
pub use expectation::ExpectedOutcome;
pub use expectation::FieldCheck;
pub use expectation::FieldSource;
pub use expectation::Mismatch;
pub use expectation::Severity;
pub use expectation::Verdict;
pub use fixtures::Capture;
pub use fixtures::FixtureError;
pub use fixtures::Fixtures;
pub use identifiers::RecordId;
pub use identifiers::RecordIdError;
pub use identifiers::RecordKind;
pub use outcome::Outcome;
pub use outcome::ResponseBody;
pub use outcome::TransportError;
pub use record::Fetched;
pub use record::FieldValue;
pub use record::ReconciledRecord;
pub use request::FilePart;
pub use request::Method;
pub use request::Payload;
pub use request::Request;
pub use request::StatusTolerance;
