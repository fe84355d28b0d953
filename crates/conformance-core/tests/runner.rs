// crates/conformance-core/tests/runner.rs
// ============================================================================
// Module: Scenario Runner Tests
// Description: Severity, abort, fixture sharing, and reconciliation behavior.
// ============================================================================
//! ## Overview
//! Drives the harness with a scripted request driver and the in-memory record
//! store to pin down step accounting and scenario states.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use conformance_core::Capture;
use conformance_core::ExpectedOutcome;
use conformance_core::FieldCheck;
use conformance_core::GroupMode;
use conformance_core::Harness;
use conformance_core::InMemoryRecordStore;
use conformance_core::Outcome;
use conformance_core::RecordId;
use conformance_core::RecordKind;
use conformance_core::Request;
use conformance_core::RequestDriver;
use conformance_core::ResponseBody;
use conformance_core::Scenario;
use conformance_core::ScenarioGroup;
use conformance_core::ScenarioState;
use conformance_core::SetupAction;
use conformance_core::Severity;
use conformance_core::Step;
use conformance_core::StepStatus;
use conformance_core::Suite;
use conformance_core::TransportError;
use conformance_core::WaitPolicy;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fakes
// ============================================================================

type Reply = Result<Outcome, TransportError>;

/// Driver answering from per-route queues; the last reply of a route repeats.
#[derive(Default)]
struct ScriptedDriver {
    routes: Mutex<BTreeMap<String, VecDeque<Reply>>>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedDriver {
    fn route(self, route: &str, reply: Reply) -> Self {
        self.routes.lock().unwrap().entry(route.to_string()).or_default().push_back(reply);
        self
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestDriver for ScriptedDriver {
    async fn send(&self, request: &Request) -> Result<Outcome, TransportError> {
        let route = request.to_string();
        self.sent.lock().unwrap().push(route.clone());
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&route) else {
            return Err(TransportError::Connect(format!("no route for {route}")));
        };
        if queue.len() > 1 {
            return queue.pop_front().unwrap();
        }
        queue.front().cloned().unwrap()
    }
}

/// Driver that never answers before the harness timeout.
struct StalledDriver;

#[async_trait]
impl RequestDriver for StalledDriver {
    async fn send(&self, _request: &Request) -> Result<Outcome, TransportError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Outcome::new(200, ResponseBody::Empty))
    }
}

fn ok_json(status: u16, body: Value) -> Reply {
    Ok(Outcome::new(status, ResponseBody::Json(body)))
}

fn status_step(name: &str, path: &str, status: u16) -> Step {
    Step::new(name, Request::get(path), ExpectedOutcome::status(status))
}

const MODEL_ID: &str = "65a1b2c3d4e5f60718293a4b";

fn models() -> RecordKind {
    RecordKind::new("modelfilemodels")
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// SECTION: Severity and Abort
// ============================================================================

#[tokio::test]
async fn soft_failures_without_a_pass_fail_the_scenario() {
    let driver = ScriptedDriver::default().route("GET /a", ok_json(500, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let scenario = Scenario::new("all soft")
        .step(status_step("first", "/a", 200))
        .step(status_step("again", "/a", 200));
    let mut fixtures = conformance_core::Fixtures::new();
    let report = harness.run_scenario(&scenario, &mut fixtures).await;

    assert_eq!(report.state, ScenarioState::Failed);
    assert!(report.steps.iter().all(|step| step.status.label() == "soft-fail"));
}

#[tokio::test]
async fn soft_failure_records_and_continues() {
    let driver = ScriptedDriver::default()
        .route("GET /a", ok_json(500, json!({})))
        .route("GET /b", ok_json(200, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let scenario = Scenario::new("soft")
        .step(status_step("first", "/a", 200))
        .step(status_step("second", "/b", 200));
    let mut fixtures = conformance_core::Fixtures::new();
    let report = harness.run_scenario(&scenario, &mut fixtures).await;

    assert_eq!(report.state, ScenarioState::PartiallyFailed);
    assert_eq!(report.steps.len(), 2);
    match &report.steps[0].status {
        StepStatus::Failed {
            severity,
            mismatch,
        } => {
            assert_eq!(*severity, Severity::Soft);
            assert_eq!(mismatch.expected, "200");
            assert_eq!(mismatch.observed, "500");
        }
        other => panic!("unexpected status {other:?}"),
    }
    assert_eq!(report.steps[1].status, StepStatus::Passed);
}

#[tokio::test]
async fn hard_failure_skips_remaining_steps_and_runs_teardown() {
    let driver = Arc::new(
        ScriptedDriver::default()
            .route("GET /a", ok_json(400, json!({})))
            .route("DELETE /cleanup", ok_json(200, json!({}))),
    );
    let harness = Harness::new(driver.clone());
    let scenario = Scenario::new("hard")
        .step(status_step("first", "/a", 200).hard())
        .step(status_step("second", "/b", 200))
        .teardown(Request::delete("/cleanup"));
    let report = harness.run_scenario(&scenario, &mut conformance_core::Fixtures::new()).await;

    assert_eq!(report.state, ScenarioState::Failed);
    assert!(matches!(report.steps[0].status, StepStatus::Failed { severity: Severity::Hard, .. }));
    assert!(matches!(report.steps[1].status, StepStatus::NotRun { .. }));
    assert_eq!(driver.sent(), vec!["GET /a".to_string(), "DELETE /cleanup".to_string()]);
}

#[tokio::test]
async fn transport_failure_is_infrastructure_not_assertion() {
    let driver = ScriptedDriver::default()
        .route("GET /a", Err(TransportError::Connect("refused".to_string())))
        .route("GET /b", ok_json(200, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let suite = Suite::new("transport").group(
        ScenarioGroup::serial("only")
            .scenario(
                Scenario::new("broken")
                    .step(status_step("first", "/a", 200))
                    .step(status_step("second", "/b", 200)),
            )
            .scenario(Scenario::new("healthy").step(status_step("third", "/b", 200))),
    );
    let report = harness.run_suite(suite).await;
    let group = &report.groups[0];

    let broken = &group.scenarios[0];
    assert_eq!(broken.state, ScenarioState::Failed);
    match &broken.steps[0].status {
        StepStatus::Infrastructure {
            error,
        } => assert!(error.contains("refused")),
        other => panic!("unexpected status {other:?}"),
    }
    assert!(matches!(broken.steps[1].status, StepStatus::NotRun { .. }));
    assert_eq!(group.scenarios[1].state, ScenarioState::Passed);

    let tally = report.tally();
    assert_eq!(tally.infrastructure, 1);
    assert_eq!(tally.soft_failed + tally.hard_failed, 0);
    assert_eq!(tally.not_run, 1);
    assert!(!report.passed());
}

// ============================================================================
// SECTION: Setup and Fixtures
// ============================================================================

#[tokio::test]
async fn serial_group_shares_captured_fixtures() {
    let driver = ScriptedDriver::default()
        .route(
            "POST /api/graphql",
            ok_json(200, json!({ "data": { "createProject": { "id": "p-1" } } })),
        )
        .route("GET /api/report/p-1", ok_json(200, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let group = ScenarioGroup::serial("reports")
        .scenario(
            Scenario::new("create")
                .setup(
                    SetupAction::new(Request::graphql(
                        "/api/graphql",
                        "mutation { createProject }",
                        None,
                    ))
                    .capture(Capture::pointer("project_id", "/data/createProject/id")),
                )
                .step(status_step("noop", "/api/report/p-1", 200)),
        )
        .scenario(
            Scenario::new("reuse").step(status_step("report", "/api/report/${project_id}", 200)),
        );
    let report = harness.run_group(group).await;

    assert_eq!(report.mode, GroupMode::Serial);
    assert!(report.passed(), "{report:?}");
}

#[tokio::test]
async fn concurrent_scenarios_do_not_see_each_other_fixtures() {
    let driver = ScriptedDriver::default()
        .route("POST /seed", ok_json(200, json!({ "id": "s-1" })))
        .route("GET /items/s-1", ok_json(200, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let group = ScenarioGroup::concurrent("isolated")
        .scenario(
            Scenario::new("owner")
                .setup(
                    SetupAction::new(Request::post("/seed"))
                        .capture(Capture::pointer("seed", "/id")),
                )
                .step(status_step("own", "/items/${seed}", 200)),
        )
        .scenario(Scenario::new("stranger").step(status_step("foreign", "/items/${seed}", 200)));
    let report = harness.run_group(group).await;

    assert_eq!(report.scenarios[0].name, "owner");
    assert_eq!(report.scenarios[0].state, ScenarioState::Passed);
    assert_eq!(report.scenarios[1].name, "stranger");
    match &report.scenarios[1].steps[0].status {
        StepStatus::Infrastructure {
            error,
        } => assert!(error.contains("seed")),
        other => panic!("unexpected status {other:?}"),
    }
}

#[tokio::test]
async fn setup_failure_marks_every_step_not_run() {
    let driver = ScriptedDriver::default().route("POST /seed", ok_json(500, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let scenario = Scenario::new("seedless")
        .setup(SetupAction::new(Request::post("/seed")).capture(Capture::pointer("seed", "/id")))
        .step(status_step("one", "/one", 200))
        .step(status_step("two", "/two", 200));
    let report = harness.run_scenario(&scenario, &mut conformance_core::Fixtures::new()).await;

    assert_eq!(report.state, ScenarioState::Failed);
    assert!(report.setup_error.as_deref().unwrap().contains("500"));
    assert_eq!(report.steps.len(), 2);
    assert!(report.steps.iter().all(|step| matches!(step.status, StepStatus::NotRun { .. })));
}

#[tokio::test]
async fn group_setup_failure_aborts_every_scenario() {
    let driver = ScriptedDriver::default().route("POST /seed", ok_json(200, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let group = ScenarioGroup::serial("seeded")
        .setup(SetupAction::new(Request::post("/seed")).capture(Capture::pointer("seed", "/id")))
        .scenario(Scenario::new("a").step(status_step("one", "/one", 200)))
        .scenario(Scenario::new("b").step(status_step("two", "/two", 200)));
    let report = harness.run_group(group).await;

    assert!(report.setup_error.as_deref().unwrap().contains("seed"));
    assert_eq!(report.scenarios.len(), 2);
    assert!(report.scenarios.iter().all(|scenario| scenario.state == ScenarioState::Failed));
    assert!(!report.passed());
}

#[tokio::test(start_paused = true)]
async fn settled_setup_retries_until_capture_resolves() {
    let driver = Arc::new(
        ScriptedDriver::default()
            .route("POST /api/graphql", ok_json(200, json!({ "data": { "models": [] } })))
            .route(
                "POST /api/graphql",
                ok_json(200, json!({ "data": { "models": [{ "id": MODEL_ID }] } })),
            )
            .route("GET /models/65a1b2c3d4e5f60718293a4b", ok_json(200, json!({}))),
    );
    let harness = Harness::new(driver.clone());
    let scenario = Scenario::new("settle")
        .setup(
            SetupAction::new(Request::graphql("/api/graphql", "query { models { id } }", None))
                .capture(Capture::pointer("model_id", "/data/models/0/id"))
                .settle_until_captured(),
        )
        .step(status_step("read", "/models/${model_id}", 200));
    let report = harness.run_scenario(&scenario, &mut conformance_core::Fixtures::new()).await;

    assert_eq!(report.state, ScenarioState::Passed);
    let graphql_calls =
        driver.sent().iter().filter(|route| route.as_str() == "POST /api/graphql").count();
    assert_eq!(graphql_calls, 2);
}

// ============================================================================
// SECTION: Reconciliation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn record_match_waits_for_asynchronous_persistence() {
    let store = Arc::new(InMemoryRecordStore::new());
    let id = RecordId::parse(MODEL_ID).unwrap();
    store.insert_after(&models(), &id, fields(json!({ "name": "credit", "status": "Valid" })), 2);
    let driver = ScriptedDriver::default().route(
        "POST /api/graphql",
        ok_json(200, json!({ "data": { "updateModel": { "name": "credit", "status": "Valid" } } })),
    );
    let harness = Harness::new(Arc::new(driver))
        .with_store(store.clone())
        .with_wait(WaitPolicy::backoff(
            Duration::from_millis(50),
            Duration::from_millis(200),
            Duration::from_secs(5),
        ));
    let scenario = Scenario::new("update").step(Step::new(
        "update persists",
        Request::graphql("/api/graphql", "mutation { updateModel }", None),
        ExpectedOutcome::record_matches(models(), MODEL_ID, vec![
            FieldCheck::response("name", "/data/updateModel/name"),
            FieldCheck::literal("status", json!("Valid")),
        ]),
    ));
    let report = harness.run_scenario(&scenario, &mut conformance_core::Fixtures::new()).await;

    assert_eq!(report.state, ScenarioState::Passed, "{report:?}");
    assert_eq!(store.reads(), 3);
}

#[tokio::test]
async fn record_mismatch_lists_every_divergent_field() {
    let store = Arc::new(InMemoryRecordStore::new());
    let id = RecordId::parse(MODEL_ID).unwrap();
    store.insert(&models(), &id, fields(json!({ "name": "old", "description": "old" })));
    let driver = ScriptedDriver::default()
        .route("POST /update", ok_json(200, json!({ "name": "new", "description": "new" })));
    let harness =
        Harness::new(Arc::new(driver)).with_store(store).with_wait(WaitPolicy::Immediate);
    let scenario = Scenario::new("mismatch").step(Step::new(
        "fields",
        Request::post("/update"),
        ExpectedOutcome::record_matches(models(), MODEL_ID, vec![
            FieldCheck::response("name", "/name"),
            FieldCheck::response("description", "/description"),
            FieldCheck::literal("size", json!(10)),
        ]),
    ));
    let report = harness.run_scenario(&scenario, &mut conformance_core::Fixtures::new()).await;

    match &report.steps[0].status {
        StepStatus::Failed {
            mismatch, ..
        } => {
            assert_eq!(mismatch.expected, r#"name = "new"; description = "new"; size = 10"#);
            assert_eq!(mismatch.observed, r#"name = "old"; description = "old"; size = <missing>"#);
        }
        other => panic!("unexpected status {other:?}"),
    }
}

#[tokio::test]
async fn record_absent_passes_once_deleted_and_needs_a_store() {
    let store = Arc::new(InMemoryRecordStore::new());
    let driver = Arc::new(ScriptedDriver::default().route("POST /delete", ok_json(200, json!({}))));
    let step = Step::new(
        "gone",
        Request::post("/delete"),
        ExpectedOutcome::record_absent(models(), "${model_id}"),
    );
    let scenario = Scenario::new("delete").step(step);
    let mut fixtures = conformance_core::Fixtures::new();
    fixtures.insert("model_id", json!(MODEL_ID));

    let with_store =
        Harness::new(driver.clone()).with_store(store).with_wait(WaitPolicy::Immediate);
    let report = with_store.run_scenario(&scenario, &mut fixtures.clone()).await;
    assert_eq!(report.state, ScenarioState::Passed);

    let without_store = Harness::new(driver);
    let report = without_store.run_scenario(&scenario, &mut fixtures).await;
    match &report.steps[0].status {
        StepStatus::Infrastructure {
            error,
        } => assert!(error.contains("modelfilemodels")),
        other => panic!("unexpected status {other:?}"),
    }
}

#[tokio::test]
async fn malformed_record_id_is_infrastructure() {
    let store = Arc::new(InMemoryRecordStore::new());
    let driver = ScriptedDriver::default().route("POST /delete", ok_json(200, json!({})));
    let harness = Harness::new(Arc::new(driver)).with_store(store);
    let scenario = Scenario::new("bad id").step(Step::new(
        "gone",
        Request::post("/delete"),
        ExpectedOutcome::record_absent(models(), "not-an-id"),
    ));
    let report = harness.run_scenario(&scenario, &mut conformance_core::Fixtures::new()).await;

    assert!(matches!(report.steps[0].status, StepStatus::Infrastructure { .. }));
}

// ============================================================================
// SECTION: Timeouts and Reports
// ============================================================================

#[tokio::test(start_paused = true)]
async fn stalled_request_times_out_as_infrastructure() {
    let harness = Harness::new(Arc::new(StalledDriver)).with_step_timeout(Duration::from_secs(2));
    let scenario = Scenario::new("stalled")
        .step(status_step("slow", "/slow", 200))
        .step(status_step("after", "/after", 200));
    let report = harness.run_scenario(&scenario, &mut conformance_core::Fixtures::new()).await;

    match &report.steps[0].status {
        StepStatus::Infrastructure {
            error,
        } => assert!(error.contains("timed out")),
        other => panic!("unexpected status {other:?}"),
    }
    assert!(matches!(report.steps[1].status, StepStatus::NotRun { .. }));
}

#[tokio::test]
async fn concurrent_groups_keep_declaration_order_and_render_markdown() {
    let driver = ScriptedDriver::default()
        .route("GET /ok", ok_json(200, json!({})))
        .route("GET /bad", ok_json(500, json!({})));
    let harness = Harness::new(Arc::new(driver));
    let suite = Suite::new("markdown")
        .concurrent_groups()
        .group(
            ScenarioGroup::concurrent("first")
                .scenario(Scenario::new("ok").step(status_step("ok", "/ok", 200))),
        )
        .group(
            ScenarioGroup::serial("second")
                .scenario(Scenario::new("bad").step(status_step("bad", "/bad", 200))),
        );
    let report = harness.run_suite(suite).await;

    assert_eq!(report.groups[0].name, "first");
    assert_eq!(report.groups[1].name, "second");
    let markdown = report.to_markdown();
    assert!(markdown.contains("# Conformance Report: markdown"));
    assert!(markdown.contains("- [soft-fail] bad"));
    assert!(markdown.contains("  - expected: 200"));
    assert!(markdown.contains("  - observed: 500"));
    assert!(markdown.contains("- Result: fail"));
}
