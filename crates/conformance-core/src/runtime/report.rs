// crates/conformance-core/src/runtime/report.rs
// ============================================================================
// Module: Conformance Reports
// Description: Per-step, per-scenario, per-group, and suite results.
// Purpose: Record exactly one result per step and render the final report.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Reports enumerate every scenario with its per-step results and the literal
//! expected vs. observed values of each failure. Infrastructure failures are
//! kept distinct from assertion failures.
//! Invariants:
//! - Every declared step appears exactly once in its scenario report.
//! - Pass/fail of a group or suite is the conjunction of all step results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Discrepancy;
use crate::core::Mismatch;
use crate::core::Severity;
use crate::runtime::scenario::GroupMode;
use crate::runtime::scenario::Scenario;
use crate::runtime::scenario::Step;

// ============================================================================
// SECTION: Step Results
// ============================================================================

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// Observed matched expected.
    Passed,
    /// Assertion failure.
    Failed {
        /// Declared severity.
        severity: Severity,
        /// Literal expected vs. observed values.
        mismatch: Mismatch,
    },
    /// Transport, store, or fixture failure unrelated to the assertion.
    Infrastructure {
        /// Failure description.
        error: String,
    },
    /// Skipped after an earlier abort.
    NotRun {
        /// Why the step was skipped.
        reason: String,
    },
}

impl StepStatus {
    /// Returns a stable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Failed {
                severity: Severity::Soft,
                ..
            } => "soft-fail",
            Self::Failed {
                severity: Severity::Hard,
                ..
            } => "hard-fail",
            Self::Infrastructure {
                ..
            } => "infrastructure",
            Self::NotRun {
                ..
            } => "not-run",
        }
    }

    /// Returns true when the remaining steps must be skipped.
    #[must_use]
    pub const fn aborts(&self) -> bool {
        matches!(
            self,
            Self::Failed {
                severity: Severity::Hard,
                ..
            } | Self::Infrastructure { .. }
        )
    }
}

/// Recorded result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Step name.
    pub name: String,
    /// Rendered expectation.
    pub expected: String,
    /// Result.
    #[serde(flatten)]
    pub status: StepStatus,
}

impl StepReport {
    /// Creates a report for a step.
    #[must_use]
    pub fn new(step: &Step, status: StepStatus) -> Self {
        Self {
            name: step.name.clone(),
            expected: step.expected.to_string(),
            status,
        }
    }

    /// Creates a not-run report for a step.
    #[must_use]
    pub fn not_run(step: &Step, reason: &str) -> Self {
        Self::new(
            step,
            StepStatus::NotRun {
                reason: reason.to_string(),
            },
        )
    }
}

// ============================================================================
// SECTION: Scenario Results
// ============================================================================

/// Scenario lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    /// Not started.
    Pending,
    /// Executing steps.
    Running,
    /// Every step passed.
    Passed,
    /// A hard, infrastructure, or setup failure occurred, or no step passed.
    Failed,
    /// Soft failures occurred next to at least one passing step.
    PartiallyFailed,
}

impl ScenarioState {
    /// Returns true for terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed | Self::PartiallyFailed)
    }

    /// Derives the terminal state from step results.
    ///
    /// Setup failures and aborting steps make the scenario `Failed`. Soft
    /// failures make it `PartiallyFailed` while at least one step passed,
    /// and `Failed` once none did.
    #[must_use]
    pub fn from_steps(steps: &[StepReport], setup_failed: bool) -> Self {
        if setup_failed || steps.iter().any(|step| step.status.aborts()) {
            return Self::Failed;
        }
        if !steps.iter().any(|step| matches!(step.status, StepStatus::Failed { .. })) {
            return Self::Passed;
        }
        if steps.iter().any(|step| step.status == StepStatus::Passed) {
            Self::PartiallyFailed
        } else {
            Self::Failed
        }
    }

    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::PartiallyFailed => "partially_failed",
        }
    }
}

/// Recorded result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Terminal state.
    pub state: ScenarioState,
    /// Setup failure, when setup did not complete.
    pub setup_error: Option<String>,
    /// Per-step results in declaration order.
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    /// Builds a report from completed step results.
    #[must_use]
    pub fn completed(name: &str, steps: Vec<StepReport>) -> Self {
        Self {
            name: name.to_string(),
            state: ScenarioState::from_steps(&steps, false),
            setup_error: None,
            steps,
        }
    }

    /// Builds a report for a scenario that never reached its steps.
    #[must_use]
    pub fn aborted(scenario: &Scenario, error: &str) -> Self {
        let reason = format!("scenario aborted before steps: {error}");
        Self {
            name: scenario.name.clone(),
            state: ScenarioState::Failed,
            setup_error: Some(error.to_string()),
            steps: scenario.steps.iter().map(|step| StepReport::not_run(step, &reason)).collect(),
        }
    }

    /// Returns true when the scenario passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.state == ScenarioState::Passed
    }
}

// ============================================================================
// SECTION: Group and Suite Results
// ============================================================================

/// Recorded result of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Group name.
    pub name: String,
    /// Execution mode.
    pub mode: GroupMode,
    /// Group setup failure, when setup did not complete.
    pub setup_error: Option<String>,
    /// Scenario results in declaration order.
    pub scenarios: Vec<ScenarioReport>,
}

impl GroupReport {
    /// Returns true when every scenario passed and setup completed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.setup_error.is_none() && self.scenarios.iter().all(ScenarioReport::passed)
    }
}

/// Step counts by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTally {
    /// Passed steps.
    pub passed: usize,
    /// Soft assertion failures.
    pub soft_failed: usize,
    /// Hard assertion failures.
    pub hard_failed: usize,
    /// Infrastructure failures.
    pub infrastructure: usize,
    /// Skipped steps.
    pub not_run: usize,
}

/// Final report of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name.
    pub name: String,
    /// Group results in declaration order.
    pub groups: Vec<GroupReport>,
    /// Classification discrepancies flagged for the service owners.
    pub discrepancies: Vec<Discrepancy>,
}

impl SuiteReport {
    /// Returns true when every group passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.groups.iter().all(GroupReport::passed)
    }

    /// Counts step results across the suite.
    #[must_use]
    pub fn tally(&self) -> StepTally {
        let mut tally = StepTally::default();
        for step in self.steps() {
            match &step.status {
                StepStatus::Passed => tally.passed += 1,
                StepStatus::Failed {
                    severity: Severity::Soft,
                    ..
                } => tally.soft_failed += 1,
                StepStatus::Failed {
                    severity: Severity::Hard,
                    ..
                } => tally.hard_failed += 1,
                StepStatus::Infrastructure {
                    ..
                } => tally.infrastructure += 1,
                StepStatus::NotRun {
                    ..
                } => tally.not_run += 1,
            }
        }
        tally
    }

    /// Iterates over every step report.
    pub fn steps(&self) -> impl Iterator<Item = &StepReport> {
        self.groups.iter().flat_map(|group| &group.scenarios).flat_map(|scenario| &scenario.steps)
    }

    /// Renders the report as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let tally = self.tally();
        let mut out = String::new();
        let _ = writeln!(out, "# Conformance Report: {}\n", self.name);
        let _ = writeln!(out, "## Status\n");
        let _ = writeln!(out, "- Result: {}", if self.passed() { "pass" } else { "fail" });
        let _ = writeln!(
            out,
            "- Steps: {} passed, {} soft-failed, {} hard-failed, {} infrastructure, {} not run",
            tally.passed, tally.soft_failed, tally.hard_failed, tally.infrastructure, tally.not_run
        );
        for group in &self.groups {
            let _ = writeln!(out, "\n## Group: {} ({})\n", group.name, group.mode.as_str());
            if let Some(error) = &group.setup_error {
                let _ = writeln!(out, "- Setup failed: {error}");
            }
            for scenario in &group.scenarios {
                let _ = writeln!(out, "### {} [{}]\n", scenario.name, scenario.state.as_str());
                if let Some(error) = &scenario.setup_error {
                    let _ = writeln!(out, "- Setup failed: {error}");
                }
                for step in &scenario.steps {
                    render_step(&mut out, step);
                }
                out.push('\n');
            }
        }
        let _ = writeln!(out, "## Discrepancies\n");
        if self.discrepancies.is_empty() {
            out.push_str("- None\n");
        } else {
            for discrepancy in &self.discrepancies {
                let _ = writeln!(out, "- {discrepancy}");
            }
        }
        out
    }
}

/// Renders one step line (and failure detail) into `out`.
fn render_step(out: &mut String, step: &StepReport) {
    let _ = writeln!(out, "- [{}] {}", step.status.label(), step.name);
    match &step.status {
        StepStatus::Failed {
            mismatch, ..
        } => {
            let _ = writeln!(out, "  - expected: {}", mismatch.expected);
            let _ = writeln!(out, "  - observed: {}", mismatch.observed);
        }
        StepStatus::Infrastructure {
            error,
        } => {
            let _ = writeln!(out, "  - error: {error}");
        }
        StepStatus::NotRun {
            reason,
        } => {
            let _ = writeln!(out, "  - reason: {reason}");
        }
        StepStatus::Passed => {}
    }
}
