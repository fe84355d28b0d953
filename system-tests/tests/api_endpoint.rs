// system-tests/tests/api_endpoint.rs
// ============================================================================
// Module: API Endpoint Suite
// Description: Aggregates REST endpoint conformance tests into one binary.
// Purpose: Run the report, template, upload, and plugin groups live.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates REST endpoint conformance tests into one binary.
//! Invariants:
//! - Requires a reachable application at `CONFORMANCE_ENDPOINT`.
//! - Fixture files must exist under `CONFORMANCE_FIXTURE_DIR`.

mod helpers;

#[path = "suites/api_endpoint.rs"]
mod api_endpoint;
