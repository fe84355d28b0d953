// crates/conformance-core/src/lib.rs
// ============================================================================
// Module: Conformance Core
// Description: Backend-agnostic API conformance harness.
// Purpose: Drive requests, reconcile stored state, and run scenarios.
// Dependencies: serde, serde_json, thiserror, async-trait, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate holds the data model and runner of the conformance harness. A
//! scenario sends requests through a [`RequestDriver`], compares the observed
//! outcomes against declared expectations, and optionally reads authoritative
//! records through a [`RecordStore`] to confirm that a mutation persisted.
//! Invariants:
//! - Transport failures are never reported as assertion failures.
//! - Record comparisons are exact and field by field.
//! - Reports contain exactly one result per declared step.
//!
//! ## Index
//! - Data model: [`core`]
//! - Seams: [`interfaces`]
//! - Execution and reporting: [`runtime`]

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;
pub use crate::interfaces::RecordStore;
pub use crate::interfaces::RequestDriver;
pub use crate::interfaces::StoreError;
pub use crate::runtime::*;
