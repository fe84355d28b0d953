// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Centralized configuration for conformance system tests.
// Purpose: Provide typed access to test environment settings and defaults.
// Dependencies: conformance-core, thiserror, url
// ============================================================================

//! ## Overview
//! System-test configuration is read from environment variables and mapped into
//! a small typed structure that the test binaries inject into the driver, the
//! record store, and the harness.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod env_tests;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::ConfigError;
pub use env::DEFAULT_ENDPOINT;
pub use env::DEFAULT_FIXTURE_DIR;
pub use env::DEFAULT_LOG_LEVEL;
pub use env::DEFAULT_SETTLE_TIMEOUT;
pub use env::DEFAULT_STORE_DATABASE;
pub use env::LogFormat;
pub use env::SystemTestConfig;
pub use env::SystemTestEnv;
pub use env::read_env_strict;
