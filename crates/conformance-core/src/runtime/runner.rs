// crates/conformance-core/src/runtime/runner.rs
// ============================================================================
// Module: Scenario Runner
// Description: Executes suites, groups, and scenarios against a driver.
// Purpose: Orchestrate setup, steps, reconciliation, and teardown.
// Dependencies: crate::core, crate::interfaces, tokio, tracing, thiserror
// ============================================================================

//! ## Overview
//! [`Harness`] composes a [`RequestDriver`] with an optional [`RecordStore`].
//! Serial groups share one fixture set and run scenarios in order; concurrent
//! groups hand each scenario a private copy of the group fixtures.
//! Invariants:
//! - Every declared step yields exactly one [`StepReport`].
//! - Hard failures and infrastructure failures abort the remaining steps of
//!   their scenario only; soft failures never abort.
//! - Setup failure marks every affected step as not run.
//! - Teardown runs after every scenario and is never asserted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::Instrument;
use tracing::error;
use tracing::info;
use tracing::info_span;
use tracing::warn;

use crate::core::Capture;
use crate::core::ExpectedOutcome;
use crate::core::Fetched;
use crate::core::FieldCheck;
use crate::core::FixtureError;
use crate::core::Fixtures;
use crate::core::Mismatch;
use crate::core::Outcome;
use crate::core::RecordId;
use crate::core::RecordIdError;
use crate::core::RecordKind;
use crate::core::Request;
use crate::core::TransportError;
use crate::core::Verdict;
use crate::core::expectation::check_graphql_errors;
use crate::core::expectation::check_graphql_rejected;
use crate::core::expectation::check_list_contains;
use crate::core::expectation::check_list_len;
use crate::core::expectation::check_status;
use crate::core::expectation::compare_fields;
use crate::interfaces::RecordStore;
use crate::interfaces::RequestDriver;
use crate::interfaces::StoreError;
use crate::runtime::report::GroupReport;
use crate::runtime::report::ScenarioReport;
use crate::runtime::report::ScenarioState;
use crate::runtime::report::StepReport;
use crate::runtime::report::StepStatus;
use crate::runtime::report::SuiteReport;
use crate::runtime::scenario::GroupMode;
use crate::runtime::scenario::Scenario;
use crate::runtime::scenario::ScenarioGroup;
use crate::runtime::scenario::SetupAction;
use crate::runtime::scenario::Step;
use crate::runtime::scenario::Suite;
use crate::runtime::wait::WaitPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default upper bound for one request exchange.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures that prevent a step or setup action from being evaluated.
#[derive(Debug, Error)]
enum StepError {
    /// Request could not be delivered.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A placeholder could not be resolved.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// The backing store could not answer.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A resolved record id is malformed.
    #[error("record id {id} is invalid: {source}")]
    RecordId {
        /// Resolved id text.
        id: String,
        /// Parse failure.
        source: RecordIdError,
    },
    /// A record expectation ran without a configured store.
    #[error("no record store configured to reconcile {0}")]
    NoStore(RecordKind),
    /// A setup capture found nothing in the response.
    #[error("setup response of {request} has no value for capture {capture}")]
    Capture {
        /// Rendered request.
        request: String,
        /// Capture name.
        capture: String,
    },
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Runs scenarios against a request driver and an optional record store.
#[derive(Clone)]
pub struct Harness {
    /// Request driver for the API under test.
    driver: Arc<dyn RequestDriver>,
    /// Authoritative store used for reconciliation.
    store: Option<Arc<dyn RecordStore>>,
    /// Settle policy for asynchronous effects.
    wait: WaitPolicy,
    /// Upper bound for one request exchange.
    step_timeout: Duration,
}

impl Harness {
    /// Creates a harness without a record store.
    #[must_use]
    pub fn new(driver: Arc<dyn RequestDriver>) -> Self {
        Self {
            driver,
            store: None,
            wait: WaitPolicy::default(),
            step_timeout: DEFAULT_STEP_TIMEOUT,
        }
    }

    /// Attaches the record store used by record expectations.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the settle policy.
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Replaces the per-request timeout.
    #[must_use]
    pub const fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    /// Runs a suite and returns its report.
    pub async fn run_suite(&self, suite: Suite) -> SuiteReport {
        let span = info_span!("suite", suite = %suite.name);
        async move {
            info!(
                groups = suite.groups.len(),
                concurrent = suite.concurrent_groups,
                "suite started"
            );
            let groups = if suite.concurrent_groups {
                self.run_groups_concurrently(suite.groups).await
            } else {
                let mut reports = Vec::with_capacity(suite.groups.len());
                for group in suite.groups {
                    reports.push(self.run_group(group).await);
                }
                reports
            };
            let report = SuiteReport {
                name: suite.name,
                groups,
                discrepancies: suite.discrepancies,
            };
            for discrepancy in &report.discrepancies {
                warn!(%discrepancy, "classification discrepancy");
            }
            let tally = report.tally();
            info!(
                passed = report.passed(),
                steps_passed = tally.passed,
                soft_failed = tally.soft_failed,
                hard_failed = tally.hard_failed,
                infrastructure = tally.infrastructure,
                not_run = tally.not_run,
                "suite finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Runs one group and returns its report.
    pub async fn run_group(&self, group: ScenarioGroup) -> GroupReport {
        let span = info_span!("group", group = %group.name, mode = group.mode.as_str());
        self.group_inner(group).instrument(span).await
    }

    /// Runs one scenario against `fixtures`, adding its setup captures.
    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        fixtures: &mut Fixtures,
    ) -> ScenarioReport {
        let span = info_span!("scenario", scenario = %scenario.name);
        self.scenario_inner(scenario, fixtures).instrument(span).await
    }

    /// Group body executed inside the group span.
    async fn group_inner(&self, group: ScenarioGroup) -> GroupReport {
        let mut fixtures = Fixtures::new();
        for action in &group.setup {
            if let Err(err) = self.run_setup(action, &mut fixtures).await {
                error!(error = %err, "group setup failed");
                let reason = format!("group setup failed: {err}");
                return GroupReport {
                    name: group.name,
                    mode: group.mode,
                    setup_error: Some(err.to_string()),
                    scenarios: group
                        .scenarios
                        .iter()
                        .map(|scenario| ScenarioReport::aborted(scenario, &reason))
                        .collect(),
                };
            }
        }
        let scenarios = match group.mode {
            GroupMode::Serial => {
                let mut reports = Vec::with_capacity(group.scenarios.len());
                for scenario in &group.scenarios {
                    reports.push(self.run_scenario(scenario, &mut fixtures).await);
                }
                reports
            }
            GroupMode::Concurrent => {
                self.run_scenarios_concurrently(&group.scenarios, &fixtures).await
            }
        };
        GroupReport {
            name: group.name,
            mode: group.mode,
            setup_error: None,
            scenarios,
        }
    }

    /// Runs groups as independent tasks, keeping declaration order.
    async fn run_groups_concurrently(&self, groups: Vec<ScenarioGroup>) -> Vec<GroupReport> {
        let mut slots: Vec<Option<GroupReport>> = groups.iter().map(|_| None).collect();
        let mut tasks = JoinSet::new();
        for (index, group) in groups.iter().cloned().enumerate() {
            let harness = self.clone();
            tasks.spawn(async move { (index, harness.run_group(group).await) }.in_current_span());
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(report);
                    }
                }
                Err(err) => error!(error = %err, "group task failed"),
            }
        }
        groups
            .iter()
            .zip(slots)
            .map(|(group, slot)| {
                slot.unwrap_or_else(|| GroupReport {
                    name: group.name.clone(),
                    mode: group.mode,
                    setup_error: Some("group task did not complete".to_string()),
                    scenarios: group
                        .scenarios
                        .iter()
                        .map(|scenario| {
                            ScenarioReport::aborted(scenario, "group task did not complete")
                        })
                        .collect(),
                })
            })
            .collect()
    }

    /// Runs scenarios as independent tasks on private fixture copies.
    async fn run_scenarios_concurrently(
        &self,
        scenarios: &[Scenario],
        fixtures: &Fixtures,
    ) -> Vec<ScenarioReport> {
        let mut slots: Vec<Option<ScenarioReport>> = scenarios.iter().map(|_| None).collect();
        let mut tasks = JoinSet::new();
        for (index, scenario) in scenarios.iter().cloned().enumerate() {
            let harness = self.clone();
            let mut private = fixtures.clone();
            let task = async move { (index, harness.run_scenario(&scenario, &mut private).await) };
            tasks.spawn(task.in_current_span());
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(report);
                    }
                }
                Err(err) => error!(error = %err, "scenario task failed"),
            }
        }
        scenarios
            .iter()
            .zip(slots)
            .map(|(scenario, slot)| {
                slot.unwrap_or_else(|| {
                    ScenarioReport::aborted(scenario, "scenario task did not complete")
                })
            })
            .collect()
    }

    /// Scenario body executed inside the scenario span.
    async fn scenario_inner(
        &self,
        scenario: &Scenario,
        fixtures: &mut Fixtures,
    ) -> ScenarioReport {
        info!(
            state = ScenarioState::Running.as_str(),
            steps = scenario.steps.len(),
            "scenario started"
        );
        for action in &scenario.setup {
            if let Err(err) = self.run_setup(action, fixtures).await {
                error!(error = %err, "scenario setup failed");
                self.teardown(scenario, fixtures).await;
                return ScenarioReport::aborted(scenario, &err.to_string());
            }
        }
        let mut abort: Option<String> = None;
        let mut steps = Vec::with_capacity(scenario.steps.len());
        for step in &scenario.steps {
            if let Some(reason) = &abort {
                steps.push(StepReport::not_run(step, reason));
                continue;
            }
            let status = self.execute_step(step, fixtures).await;
            log_step(step, &status);
            if status.aborts() {
                abort = Some(format!("aborted after step {}", step.name));
            }
            steps.push(StepReport::new(step, status));
        }
        self.teardown(scenario, fixtures).await;
        let report = ScenarioReport::completed(&scenario.name, steps);
        info!(state = report.state.as_str(), "scenario finished");
        report
    }

    /// Executes one step and maps its result to a status.
    async fn execute_step(&self, step: &Step, fixtures: &Fixtures) -> StepStatus {
        match self.evaluate(step, fixtures).await {
            Ok(Verdict::Pass) => StepStatus::Passed,
            Ok(Verdict::Fail(mismatch)) => StepStatus::Failed {
                severity: step.severity,
                mismatch,
            },
            Err(err) => StepStatus::Infrastructure {
                error: err.to_string(),
            },
        }
    }

    /// Sends the step request and evaluates its expectation.
    async fn evaluate(&self, step: &Step, fixtures: &Fixtures) -> Result<Verdict, StepError> {
        let request = step.request.resolve(fixtures)?;
        let outcome = self.send(&request).await?;
        match &step.expected {
            ExpectedOutcome::Status {
                status,
            } => Ok(check_status(*status, &outcome)),
            ExpectedOutcome::GraphqlErrors {
                messages,
            } => Ok(check_graphql_errors(messages, &outcome)),
            ExpectedOutcome::GraphqlRejected => Ok(check_graphql_rejected(&outcome)),
            ExpectedOutcome::ListLen {
                pointer,
                len,
            } => Ok(check_list_len(pointer, len, &outcome, fixtures)?),
            ExpectedOutcome::ListContains {
                pointer,
                field,
                value,
                present,
            } => Ok(check_list_contains(pointer, field, value, *present, &outcome)),
            ExpectedOutcome::RecordMatches {
                kind,
                id,
                fields,
            } => self.reconcile_match(kind, id, fields, &outcome, fixtures).await,
            ExpectedOutcome::RecordAbsent {
                kind,
                id,
            } => self.reconcile_absent(kind, id, fixtures).await,
        }
    }

    /// Sends a request under the per-request timeout.
    async fn send(&self, request: &Request) -> Result<Outcome, TransportError> {
        match timeout(self.step_timeout, self.driver.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(format!(
                "{request} exceeded {}ms",
                self.step_timeout.as_millis()
            ))),
        }
    }

    /// Reads a record under the wait policy until its fields match.
    async fn reconcile_match(
        &self,
        kind: &RecordKind,
        id: &str,
        fields: &[FieldCheck],
        outcome: &Outcome,
        fixtures: &Fixtures,
    ) -> Result<Verdict, StepError> {
        let store = self.store(kind)?;
        let id = resolve_record_id(id, fixtures)?;
        let id_ref = &id;
        let settled = self
            .wait
            .settle(
                || store.fetch(kind, id_ref),
                |fetched| match fetched {
                    Fetched::Found(record) => {
                        matches!(compare_fields(fields, outcome, record), Verdict::Pass)
                    }
                    Fetched::NotFound => false,
                },
            )
            .await?;
        match settled.value {
            Fetched::Found(record) => Ok(compare_fields(fields, outcome, &record)),
            Fetched::NotFound => Ok(Verdict::Fail(Mismatch::new(
                format!("{kind}/{id} present"),
                format!("{kind}/{id} not found after {} reads", settled.attempts),
            ))),
        }
    }

    /// Reads a record under the wait policy until it disappears.
    async fn reconcile_absent(
        &self,
        kind: &RecordKind,
        id: &str,
        fixtures: &Fixtures,
    ) -> Result<Verdict, StepError> {
        let store = self.store(kind)?;
        let id = resolve_record_id(id, fixtures)?;
        let id_ref = &id;
        let settled =
            self.wait.settle(|| store.fetch(kind, id_ref), |fetched| !fetched.is_found()).await?;
        if settled.settled {
            return Ok(Verdict::Pass);
        }
        Ok(Verdict::Fail(Mismatch::new(
            format!("{kind}/{id} absent"),
            format!("{kind}/{id} still present after {} reads", settled.attempts),
        )))
    }

    /// Returns the configured store or an infrastructure error.
    fn store(&self, kind: &RecordKind) -> Result<&Arc<dyn RecordStore>, StepError> {
        self.store.as_ref().ok_or_else(|| StepError::NoStore(kind.clone()))
    }

    /// Sends a setup action and stores its captures.
    async fn run_setup(
        &self,
        action: &SetupAction,
        fixtures: &mut Fixtures,
    ) -> Result<(), StepError> {
        let request = action.request.resolve(fixtures)?;
        let request_ref = &request;
        let known: &Fixtures = fixtures;
        let outcome = if action.settle {
            self.wait
                .settle(
                    || self.send(request_ref),
                    |outcome| capture_all(&action.captures, outcome, known).is_ok(),
                )
                .await?
                .value
        } else {
            self.send(&request).await?
        };
        if !request.tolerance.accepts(outcome.status) {
            return Err(TransportError::StatusRejected(outcome.status).into());
        }
        let captured = capture_all(&action.captures, &outcome, known).map_err(|capture| {
            StepError::Capture {
                request: request.to_string(),
                capture,
            }
        })?;
        for (name, value) in captured {
            info!(fixture = %name, "fixture captured");
            fixtures.insert(name, value);
        }
        Ok(())
    }

    /// Sends teardown requests, logging failures without asserting.
    async fn teardown(&self, scenario: &Scenario, fixtures: &Fixtures) {
        for template in &scenario.teardown {
            let result = match template.resolve(fixtures) {
                Ok(request) => self.send(&request).await.map(|_| ()).map_err(StepError::from),
                Err(err) => Err(StepError::from(err)),
            };
            if let Err(err) = result {
                warn!(request = %template, error = %err, "teardown request failed");
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves and parses a record id template.
fn resolve_record_id(template: &str, fixtures: &Fixtures) -> Result<RecordId, StepError> {
    let text = fixtures.resolve_str(template)?;
    RecordId::parse(&text).map_err(|source| StepError::RecordId {
        id: text,
        source,
    })
}

/// Extracts every capture, failing with the first missing capture name.
fn capture_all(
    captures: &[Capture],
    outcome: &Outcome,
    fixtures: &Fixtures,
) -> Result<Vec<(String, Value)>, String> {
    captures
        .iter()
        .map(|capture| {
            outcome
                .body
                .as_json()
                .and_then(|body| capture.extract(body, fixtures))
                .map(|value| (capture.name().to_string(), value))
                .ok_or_else(|| capture.name().to_string())
        })
        .collect()
}

/// Emits the step result event.
fn log_step(step: &Step, status: &StepStatus) {
    match status {
        StepStatus::Passed => info!(step = %step.name, "step passed"),
        StepStatus::Failed {
            severity,
            mismatch,
        } => warn!(
            step = %step.name,
            severity = severity.as_str(),
            expected = %mismatch.expected,
            observed = %mismatch.observed,
            "step failed"
        ),
        StepStatus::Infrastructure {
            error,
        } => error!(step = %step.name, error = %error, "step infrastructure failure"),
        StepStatus::NotRun {
            ..
        } => {}
    }
}
