// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for conformance system-tests.
// Purpose: Provide live harness wiring, readiness checks, and artifacts.
// Dependencies: system-tests, conformance-core, conformance-http
// ============================================================================

//! ## Overview
//! Shared helpers for conformance system-tests.
//! Invariants:
//! - Configuration is read once per test from the environment.
//! - Every run writes its report and transcript, pass or fail.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod harness;
pub mod readiness;
