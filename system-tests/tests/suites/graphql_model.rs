// system-tests/tests/suites/graphql_model.rs
// ============================================================================
// Module: GraphQL Model Tests
// Description: Live model update/delete run with store reconciliation.
// Purpose: Verify mutations against the backing store.
// Dependencies: system-tests helpers
// ============================================================================

//! GraphQL model mutation conformance tests.

use helpers::artifacts::RunStatus;
use helpers::artifacts::TestReporter;
use helpers::harness::LiveHarness;
use system_tests::config::SystemTestEnv;
use system_tests::scenarios::graphql_model_suite;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn graphql_model_conformance() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("graphql_model_conformance")?;
    let live = LiveHarness::start().await?;
    if live.config().store_uri.is_none() {
        let note =
            format!("{} is required to reconcile model records", SystemTestEnv::StoreUri.as_str());
        reporter.finish(RunStatus::Error, vec![note], Vec::new())?;
        return Err("graphql model suite needs a record store".into());
    }
    let suite = graphql_model_suite(live.context())?;
    live.run_recorded(&mut reporter, suite).await?;
    Ok(())
}
