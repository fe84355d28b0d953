// crates/conformance-http/src/lib.rs
// ============================================================================
// Module: Conformance HTTP Driver
// Description: reqwest-backed request driver for the conformance harness.
// Purpose: Deliver JSON, form, and multipart requests and classify responses.
// Dependencies: conformance-core, reqwest, tokio, url
// ============================================================================

//! ## Overview
//! [`HttpDriver`] implements [`conformance_core::RequestDriver`] over HTTP.
//! Every status inside a request's tolerance resolves as an outcome, 4xx and
//! 5xx included; only network failures and out-of-tolerance statuses become
//! transport errors. Every exchange is appended to an in-memory transcript.
//! Invariants:
//! - The driver never retries, never follows redirects, and never logs.
//! - Response bodies larger than the configured limit fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod driver;
pub mod multipart;
pub mod transcript;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::HttpDriverConfig;
pub use config::HttpDriverError;
pub use driver::HttpDriver;
pub use transcript::TranscriptEntry;
