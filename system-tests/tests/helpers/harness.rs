// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Live Harness
// Description: Wires the HTTP driver, record store, and runner from config.
// Purpose: Give every live suite the same injected configuration.
// Dependencies: system-tests, conformance-core, conformance-http, conformance-store-mongo
// ============================================================================

//! Live harness wiring shared by the suite binaries.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use conformance_core::Harness;
use conformance_core::Suite;
use conformance_core::SuiteReport;
use conformance_http::HttpDriver;
use conformance_http::HttpDriverConfig;
use conformance_store_mongo::MongoRecordStore;
use system_tests::config::SystemTestConfig;
use system_tests::fixtures::FixtureCatalog;
use system_tests::logging::init_tracing;
use system_tests::scenarios::SuiteContext;
use tracing::info;
use tracing::warn;

use super::artifacts::RunStatus;
use super::artifacts::TestReporter;
use super::readiness::wait_for_endpoint_ready;

/// How long a suite waits for the endpoint to answer.
const READINESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Runner plus the pieces a test needs after the run.
pub struct LiveHarness {
    /// Loaded configuration.
    config: SystemTestConfig,
    /// HTTP driver; clones share one transcript.
    driver: HttpDriver,
    /// Runner wired to the driver and the optional store.
    harness: Harness,
    /// Catalog and fixture files for suite construction.
    context: SuiteContext,
}

impl LiveHarness {
    /// Loads configuration, verifies fixtures, connects, and waits for readiness.
    pub async fn start() -> Result<Self, Box<dyn Error>> {
        let config = SystemTestConfig::load()?;
        // A second suite in the same process keeps the first subscriber.
        let _ = init_tracing(&config);

        let fixtures = FixtureCatalog::new(config.fixture_dir.clone());
        fixtures.verify()?;
        let context = SuiteContext::new(fixtures)?;

        let driver_config =
            HttpDriverConfig::new(config.endpoint.as_str())?.with_timeout(config.step_timeout);
        let driver = HttpDriver::new(driver_config)?;
        wait_for_endpoint_ready(&driver, READINESS_TIMEOUT).await?;

        let mut harness = Harness::new(Arc::new(driver.clone()))
            .with_wait(config.wait_policy())
            .with_step_timeout(config.step_timeout);
        match &config.store_uri {
            Some(uri) => {
                let store = MongoRecordStore::connect(uri, &config.store_database).await?;
                info!(database = store.database_name(), "record store connected");
                harness = harness.with_store(Arc::new(store));
            }
            None => warn!("no record store configured; reconciliation steps will fail"),
        }
        info!(endpoint = %config.endpoint, "live harness ready");
        Ok(Self {
            config,
            driver,
            harness,
            context,
        })
    }

    /// Returns the loaded configuration.
    pub const fn config(&self) -> &SystemTestConfig {
        &self.config
    }

    /// Returns the driver; its transcript covers every request of the run.
    pub const fn driver(&self) -> &HttpDriver {
        &self.driver
    }

    /// Returns the runner.
    pub const fn harness(&self) -> &Harness {
        &self.harness
    }

    /// Returns the scenario context.
    pub const fn context(&self) -> &SuiteContext {
        &self.context
    }

    /// Runs `suite`, writes its report and transcript, and finishes `reporter`.
    ///
    /// Fails when any step did not pass, naming the step counts.
    pub async fn run_recorded(
        &self,
        reporter: &mut TestReporter,
        suite: Suite,
    ) -> Result<SuiteReport, Box<dyn Error>> {
        let report = self.harness.run_suite(suite).await;
        let artifacts = reporter.write_suite(&report, &self.driver.transcript())?;
        let tally = report.tally();
        let summary = format!(
            "{} passed, {} soft-failed, {} hard-failed, {} infrastructure, {} not run",
            tally.passed, tally.soft_failed, tally.hard_failed, tally.infrastructure, tally.not_run
        );
        let mut notes = vec![summary.clone()];
        notes.extend(
            report.discrepancies.iter().map(|discrepancy| format!("discrepancy: {discrepancy}")),
        );
        if !report.passed() {
            reporter.finish(RunStatus::Fail, notes, artifacts)?;
            return Err(format!("{} did not pass: {summary}", report.name).into());
        }
        reporter.finish(RunStatus::Pass, notes, artifacts)?;
        Ok(report)
    }
}
