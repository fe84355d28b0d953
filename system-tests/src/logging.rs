// system-tests/src/logging.rs
// ============================================================================
// Module: System Test Logging
// Description: Tracing subscriber setup for live conformance runs.
// Purpose: Route harness spans and step events to stderr as text or JSON.
// Dependencies: tracing-subscriber, thiserror
// ============================================================================

//! ## Overview
//! The harness emits `tracing` spans per group and scenario and one event per
//! step. Test binaries call [`init_tracing`] once; later calls in the same
//! process report [`LoggingError::AlreadyInitialized`] and leave the first
//! subscriber in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogFormat;
use crate::config::SystemTestConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Subscriber initialization errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter '{filter}': {reason}")]
    Filter {
        /// Offending directive.
        filter: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("tracing subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
///
/// # Errors
///
/// Returns [`LoggingError`] when the fallback filter is invalid or a
/// subscriber is already installed.
pub fn init_tracing(config: &SystemTestConfig) -> Result<(), LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|err| LoggingError::Filter {
            filter: config.log_level.clone(),
            reason: err.to_string(),
        })?,
    };
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
    }
    .map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}
