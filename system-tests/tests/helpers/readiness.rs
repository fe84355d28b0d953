// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness checks for the application under test.
// Purpose: Ensure the endpoint answers before a suite starts, without sleeps.
// Dependencies: conformance-core, tokio
// ============================================================================

//! Endpoint readiness polling before a live suite starts.

use std::time::Duration;
use std::time::Instant;

use conformance_core::Request;
use conformance_core::RequestDriver;
use tokio::time::sleep;

/// Polls the endpoint root until it returns any HTTP status or timeout expires.
pub async fn wait_for_endpoint_ready(
    driver: &dyn RequestDriver,
    timeout: Duration,
) -> Result<(), String> {
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match driver.send(&Request::get("/")).await {
            Ok(_) => return Ok(()),
            Err(err) => {
                if start.elapsed() > timeout {
                    return Err(format!(
                        "endpoint readiness timeout after {attempts} attempts: {err}"
                    ));
                }
                sleep(Duration::from_millis(50)).await;
            }
        }
    }
}
