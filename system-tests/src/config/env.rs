// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for conformance system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: conformance-core, thiserror, url
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8, empty values, and malformed numbers fail
//! closed with a [`ConfigError`] naming the variable.
//!
//! The store connection string is read from its own variable; it is never
//! derived from the endpoint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use conformance_core::DEFAULT_STEP_TIMEOUT;
use conformance_core::WaitPolicy;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Endpoint used when `CONFORMANCE_ENDPOINT` is unset.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000";
/// Store database used when `CONFORMANCE_STORE_DATABASE` is unset.
pub const DEFAULT_STORE_DATABASE: &str = "aiverify";
/// Fixture directory used when `CONFORMANCE_FIXTURE_DIR` is unset.
pub const DEFAULT_FIXTURE_DIR: &str = "fixtures";
/// Reconciliation deadline used when `CONFORMANCE_SETTLE_TIMEOUT_MS` is unset.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(10);
/// Log filter used when neither `RUST_LOG` nor `CONFORMANCE_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// First delay of the reconciliation backoff.
const SETTLE_INITIAL_DELAY: Duration = Duration::from_millis(100);
/// Upper bound of a single reconciliation backoff delay.
const SETTLE_MAX_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Base URL of the application under test.
    Endpoint,
    /// Read-only connection string of the backing store.
    StoreUri,
    /// Backing store database name.
    StoreDatabase,
    /// Directory holding the sample upload files.
    FixtureDir,
    /// Optional run root override.
    RunRoot,
    /// Optional per-step timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Optional reconciliation deadline in milliseconds (positive integer).
    SettleTimeoutMs,
    /// Log output format (`pretty` or `json`).
    LogFormat,
    /// Fallback log filter when `RUST_LOG` is unset.
    LogLevel,
}

impl SystemTestEnv {
    /// Every configuration key, in documentation order.
    pub const ALL: [Self; 9] = [
        Self::Endpoint,
        Self::StoreUri,
        Self::StoreDatabase,
        Self::FixtureDir,
        Self::RunRoot,
        Self::TimeoutSeconds,
        Self::SettleTimeoutMs,
        Self::LogFormat,
        Self::LogLevel,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Endpoint => "CONFORMANCE_ENDPOINT",
            Self::StoreUri => "CONFORMANCE_STORE_URI",
            Self::StoreDatabase => "CONFORMANCE_STORE_DATABASE",
            Self::FixtureDir => "CONFORMANCE_FIXTURE_DIR",
            Self::RunRoot => "CONFORMANCE_RUN_ROOT",
            Self::TimeoutSeconds => "CONFORMANCE_TIMEOUT_SEC",
            Self::SettleTimeoutMs => "CONFORMANCE_SETTLE_TIMEOUT_MS",
            Self::LogFormat => "CONFORMANCE_LOG_FORMAT",
            Self::LogLevel => "CONFORMANCE_LOG_LEVEL",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors; each names the offending variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The variable is not valid UTF-8.
    #[error("{0} must be valid UTF-8")]
    NotUnicode(String),
    /// The variable is set but empty or whitespace.
    #[error("{0} must not be empty")]
    Empty(String),
    /// The variable failed validation.
    #[error("{name} {reason}")]
    Invalid {
        /// Variable name.
        name: String,
        /// Validation failure.
        reason: String,
    },
}

impl ConfigError {
    /// Builds an [`ConfigError::Invalid`] for `name`.
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Base URL of the application under test.
    pub endpoint: Url,
    /// Backing store connection string; reconciliation needs it.
    pub store_uri: Option<String>,
    /// Backing store database name.
    pub store_database: String,
    /// Directory holding the sample upload files.
    pub fixture_dir: PathBuf,
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Per-step timeout.
    pub step_timeout: Duration,
    /// Reconciliation deadline.
    pub settle_timeout: Duration,
    /// Log output format.
    pub log_format: LogFormat,
    /// Fallback log filter.
    pub log_level: String,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when an environment value is not valid UTF-8,
    /// is empty, or fails validation (for example, a non-http endpoint or a
    /// zero timeout).
    pub fn load() -> Result<Self, ConfigError> {
        let endpoint_name = SystemTestEnv::Endpoint.as_str();
        let endpoint = parse_endpoint(
            endpoint_name,
            read_env_nonempty(endpoint_name)?.as_deref().unwrap_or(DEFAULT_ENDPOINT),
        )?;
        let store_uri = read_env_nonempty(SystemTestEnv::StoreUri.as_str())?;
        let store_database = read_env_nonempty(SystemTestEnv::StoreDatabase.as_str())?
            .unwrap_or_else(|| DEFAULT_STORE_DATABASE.to_string());
        let fixture_dir = read_env_nonempty(SystemTestEnv::FixtureDir.as_str())?
            .map_or_else(|| PathBuf::from(DEFAULT_FIXTURE_DIR), PathBuf::from);
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let step_timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_positive(SystemTestEnv::TimeoutSeconds.as_str(), &value, "seconds"))
            .transpose()?
            .map_or(DEFAULT_STEP_TIMEOUT, Duration::from_secs);
        let settle_name = SystemTestEnv::SettleTimeoutMs.as_str();
        let settle_timeout = read_env_nonempty(settle_name)?
            .map(|value| parse_positive(settle_name, &value, "milliseconds"))
            .transpose()?
            .map_or(DEFAULT_SETTLE_TIMEOUT, Duration::from_millis);
        let log_format = read_env_nonempty(SystemTestEnv::LogFormat.as_str())?
            .map(|value| parse_log_format(SystemTestEnv::LogFormat.as_str(), &value))
            .transpose()?
            .unwrap_or_default();
        let log_level = read_env_nonempty(SystemTestEnv::LogLevel.as_str())?
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        Ok(Self {
            endpoint,
            store_uri,
            store_database,
            fixture_dir,
            run_root,
            step_timeout,
            settle_timeout,
            log_format,
            log_level,
        })
    }

    /// Returns the reconciliation wait policy bounded by the settle timeout.
    #[must_use]
    pub const fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::backoff(SETTLE_INITIAL_DELAY, SETTLE_MAX_DELAY, self.settle_timeout)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::NotUnicode`] when the variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::NotUnicode(name.to_string()))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns [`ConfigError::Empty`] when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(name.to_string())),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses an http(s) endpoint with a host.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for unparsable or non-http URLs.
fn parse_endpoint(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(raw).map_err(|err| ConfigError::invalid(name, format!("must be a URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(name, "must use http or https"));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::invalid(name, "must include a host"));
    }
    Ok(url)
}

/// Parses a positive integer amount of `unit`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the value is non-numeric or zero.
fn parse_positive(name: &str, raw: &str, unit: &str) -> Result<u64, ConfigError> {
    let value: u64 = raw.trim().parse().map_err(|_| {
        ConfigError::invalid(name, format!("must be a positive integer number of {unit}"))
    })?;
    if value == 0 {
        return Err(ConfigError::invalid(name, "must be greater than zero"));
    }
    Ok(value)
}

/// Parses a log format label.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for anything but `pretty` or `json`.
fn parse_log_format(name: &str, raw: &str) -> Result<LogFormat, ConfigError> {
    match raw.trim() {
        value if value.eq_ignore_ascii_case("pretty") => Ok(LogFormat::Pretty),
        value if value.eq_ignore_ascii_case("json") => Ok(LogFormat::Json),
        _ => Err(ConfigError::invalid(name, "must be pretty or json")),
    }
}
