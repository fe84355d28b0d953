// system-tests/src/lib.rs
// ============================================================================
// Module: Conformance System Tests Library
// Description: Configuration, catalogs, and scenario suites for live runs.
// Purpose: Describe the application's API conformance suites as plain data.
// Dependencies: conformance-core, tracing-subscriber
// ============================================================================

//! ## Overview
//! This crate hosts the environment configuration, logging setup, outcome
//! catalog, GraphQL documents, fixture catalog, and scenario suites used by
//! the live system-test binaries in `system-tests/tests`.
//! Invariants:
//! - Suites are built without network access; only the test binaries talk to
//!   the application and its store.
//! - Every literal status and GraphQL message lives in [`catalog`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod graphql;
pub mod logging;
pub mod scenarios;
