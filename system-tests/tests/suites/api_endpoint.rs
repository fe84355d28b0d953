// system-tests/tests/suites/api_endpoint.rs
// ============================================================================
// Module: API Endpoint Tests
// Description: Live conformance run of the REST endpoints.
// Purpose: Report every step of the REST suite and fail on any divergence.
// Dependencies: system-tests helpers
// ============================================================================

//! REST endpoint conformance tests.

use helpers::artifacts::TestReporter;
use helpers::harness::LiveHarness;
use system_tests::scenarios::api_endpoint_suite;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn api_endpoint_conformance() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("api_endpoint_conformance")?;
    let live = LiveHarness::start().await?;
    let suite = api_endpoint_suite(live.context())?;
    let scenarios: usize = suite.groups.iter().map(|group| group.scenarios.len()).sum();

    let report = live.run_recorded(&mut reporter, suite).await?;

    let reported: usize = report.groups.iter().map(|group| group.scenarios.len()).sum();
    if reported != scenarios {
        return Err(format!("report lists {reported} scenarios, suite declared {scenarios}").into());
    }
    Ok(())
}
