// crates/conformance-core/src/runtime/scenario.rs
// ============================================================================
// Module: Scenario Model
// Description: Steps, setup actions, scenarios, groups, and suites.
// Purpose: Describe what the runner executes, as plain data.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Scenarios are declarative: every request and expectation is data, and
//! dependencies between steps flow only through named fixtures.
//! Invariants:
//! - Steps are owned by exactly one scenario.
//! - Serial groups run scenarios in declaration order and share fixtures.
//! - Concurrent groups give each scenario a private copy of the group fixtures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Capture;
use crate::core::Discrepancy;
use crate::core::ExpectedOutcome;
use crate::core::Request;
use crate::core::Severity;
use crate::core::StatusTolerance;

// ============================================================================
// SECTION: Steps
// ============================================================================

/// One request plus its expected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Step name shown in reports.
    pub name: String,
    /// Request template.
    pub request: Request,
    /// Expected outcome.
    pub expected: ExpectedOutcome,
    /// Consequence of failure.
    pub severity: Severity,
}

impl Step {
    /// Creates a soft step.
    #[must_use]
    pub fn new(name: impl Into<String>, request: Request, expected: ExpectedOutcome) -> Self {
        Self {
            name: name.into(),
            request,
            expected,
            severity: Severity::Soft,
        }
    }

    /// Marks the step as a hard assertion.
    #[must_use]
    pub const fn hard(mut self) -> Self {
        self.severity = Severity::Hard;
        self
    }
}

/// Request issued during setup whose response fills fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupAction {
    /// Request template; only 2xx responses resolve.
    pub request: Request,
    /// Fixtures captured from the response.
    pub captures: Vec<Capture>,
    /// Whether to re-send under the wait policy until every capture resolves.
    pub settle: bool,
}

impl SetupAction {
    /// Creates a setup action; its tolerance is narrowed to 2xx.
    #[must_use]
    pub fn new(request: Request) -> Self {
        Self {
            request: request.tolerance(StatusTolerance::Success),
            captures: Vec::new(),
            settle: false,
        }
    }

    /// Adds a capture.
    #[must_use]
    pub fn capture(mut self, capture: Capture) -> Self {
        self.captures.push(capture);
        self
    }

    /// Retries the action under the wait policy until its captures resolve.
    #[must_use]
    pub const fn settle_until_captured(mut self) -> Self {
        self.settle = true;
        self
    }
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Named, ordered list of steps with optional setup and teardown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Setup actions run before the first step.
    pub setup: Vec<SetupAction>,
    /// Steps in execution order.
    pub steps: Vec<Step>,
    /// Best-effort cleanup requests; their outcomes are not asserted.
    pub teardown: Vec<Request>,
}

impl Scenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: Vec::new(),
            steps: Vec::new(),
            teardown: Vec::new(),
        }
    }

    /// Appends a setup action.
    #[must_use]
    pub fn setup(mut self, action: SetupAction) -> Self {
        self.setup.push(action);
        self
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends a teardown request.
    #[must_use]
    pub fn teardown(mut self, request: Request) -> Self {
        self.teardown.push(request);
        self
    }
}

// ============================================================================
// SECTION: Groups and Suites
// ============================================================================

/// Execution mode of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    /// Scenarios run one after another and share fixtures.
    Serial,
    /// Scenarios run independently on private fixture copies.
    Concurrent,
}

impl GroupMode {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Concurrent => "concurrent",
        }
    }
}

/// Named set of scenarios with a shared setup scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioGroup {
    /// Group name.
    pub name: String,
    /// Execution mode.
    pub mode: GroupMode,
    /// Setup run once before any scenario of the group.
    pub setup: Vec<SetupAction>,
    /// Scenarios in declaration order.
    pub scenarios: Vec<Scenario>,
}

impl ScenarioGroup {
    /// Creates a serial group.
    #[must_use]
    pub fn serial(name: impl Into<String>) -> Self {
        Self::new(name, GroupMode::Serial)
    }

    /// Creates a concurrent group.
    #[must_use]
    pub fn concurrent(name: impl Into<String>) -> Self {
        Self::new(name, GroupMode::Concurrent)
    }

    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>, mode: GroupMode) -> Self {
        Self {
            name: name.into(),
            mode,
            setup: Vec::new(),
            scenarios: Vec::new(),
        }
    }

    /// Appends a group-level setup action.
    #[must_use]
    pub fn setup(mut self, action: SetupAction) -> Self {
        self.setup.push(action);
        self
    }

    /// Appends a scenario.
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }
}

/// Top-level collection of groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name.
    pub name: String,
    /// Groups in declaration order.
    pub groups: Vec<ScenarioGroup>,
    /// Whether groups may run concurrently.
    pub concurrent_groups: bool,
    /// Classification discrepancies to flag in the report.
    pub discrepancies: Vec<Discrepancy>,
}

impl Suite {
    /// Creates a suite whose groups run one after another.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
            concurrent_groups: false,
            discrepancies: Vec::new(),
        }
    }

    /// Appends a group.
    #[must_use]
    pub fn group(mut self, group: ScenarioGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Lets groups run concurrently.
    #[must_use]
    pub const fn concurrent_groups(mut self) -> Self {
        self.concurrent_groups = true;
        self
    }

    /// Records classification discrepancies to surface in the report.
    #[must_use]
    pub fn flag_discrepancies(mut self, discrepancies: Vec<Discrepancy>) -> Self {
        self.discrepancies = discrepancies;
        self
    }
}
