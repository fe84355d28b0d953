// crates/conformance-core/src/core/expectation.rs
// ============================================================================
// Module: Conformance Expectations
// Description: Expected outcomes of steps and their pure evaluation.
// Purpose: Compare observed responses and records against declared expectations.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`ExpectedOutcome`] states what a step must observe: a status, GraphQL
//! error messages, record fields, record absence, or list shape. Evaluation is
//! pure; the runner supplies the outcome, fixtures and reconciled records.
//! Invariants:
//! - Record comparisons are exact and field by field.
//! - Failures carry the literal expected and observed values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::fixtures::FixtureError;
use crate::core::fixtures::Fixtures;
use crate::core::identifiers::RecordKind;
use crate::core::outcome::Outcome;
use crate::core::record::FieldValue;
use crate::core::record::ReconciledRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Rendering used for values that were not present at all.
const MISSING: &str = "<missing>";

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Consequence of a failed assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Failure is recorded and the scenario continues.
    Soft,
    /// Failure is recorded and the remaining steps are not run.
    Hard,
}

impl Severity {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

// ============================================================================
// SECTION: Expectation Types
// ============================================================================

/// Source of the expected value of a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldSource {
    /// Value at a JSON pointer in the step response.
    Response(String),
    /// Literal value.
    Literal(Value),
}

/// One record field to compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCheck {
    /// Top-level record field name.
    pub field: String,
    /// Where the expected value comes from.
    pub source: FieldSource,
}

impl FieldCheck {
    /// Compares the record field with the value at `pointer` in the response.
    #[must_use]
    pub fn response(field: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            source: FieldSource::Response(pointer.into()),
        }
    }

    /// Compares the record field with a literal value.
    #[must_use]
    pub fn literal(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            source: FieldSource::Literal(value),
        }
    }
}

/// Expected length of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectedLen {
    /// Exact element count.
    Exact {
        /// Expected count.
        len: usize,
    },
    /// Count relative to a captured baseline fixture.
    Relative {
        /// Fixture holding the baseline count.
        baseline: String,
        /// Signed change from the baseline.
        delta: i64,
    },
}

/// What a step must observe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum ExpectedOutcome {
    /// Exact HTTP status.
    Status {
        /// Expected status code.
        status: u16,
    },
    /// GraphQL error messages, compared position by position.
    GraphqlErrors {
        /// Expected messages in order; extra observed errors are ignored.
        messages: Vec<String>,
    },
    /// At least one GraphQL error, message unspecified.
    GraphqlRejected,
    /// Record fields equal their expected values.
    RecordMatches {
        /// Record kind.
        kind: RecordKind,
        /// Record id template.
        id: String,
        /// Fields to compare.
        fields: Vec<FieldCheck>,
    },
    /// Record does not exist.
    RecordAbsent {
        /// Record kind.
        kind: RecordKind,
        /// Record id template.
        id: String,
    },
    /// Array at a pointer has the expected length.
    ListLen {
        /// JSON pointer to the array.
        pointer: String,
        /// Expected length.
        len: ExpectedLen,
    },
    /// Array at a pointer contains (or lacks) an element with `field == value`.
    ListContains {
        /// JSON pointer to the array.
        pointer: String,
        /// Element field to inspect.
        field: String,
        /// Value the field must equal.
        value: Value,
        /// Whether such an element must be present.
        present: bool,
    },
}

impl ExpectedOutcome {
    /// Expects an exact status.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Status {
            status,
        }
    }

    /// Expects GraphQL error messages in order.
    #[must_use]
    pub fn graphql_errors<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::GraphqlErrors {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Expects record fields to match.
    #[must_use]
    pub fn record_matches(
        kind: RecordKind,
        id: impl Into<String>,
        fields: Vec<FieldCheck>,
    ) -> Self {
        Self::RecordMatches {
            kind,
            id: id.into(),
            fields,
        }
    }

    /// Expects a record to be absent.
    #[must_use]
    pub fn record_absent(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::RecordAbsent {
            kind,
            id: id.into(),
        }
    }

    /// Expects an exact list length.
    #[must_use]
    pub fn list_len(pointer: impl Into<String>, len: usize) -> Self {
        Self::ListLen {
            pointer: pointer.into(),
            len: ExpectedLen::Exact {
                len,
            },
        }
    }

    /// Expects a list length relative to a captured baseline.
    #[must_use]
    pub fn list_len_delta(
        pointer: impl Into<String>,
        baseline: impl Into<String>,
        delta: i64,
    ) -> Self {
        Self::ListLen {
            pointer: pointer.into(),
            len: ExpectedLen::Relative {
                baseline: baseline.into(),
                delta,
            },
        }
    }

    /// Expects a list element with `field == value` to be present or absent.
    #[must_use]
    pub fn list_contains(
        pointer: impl Into<String>,
        field: impl Into<String>,
        value: Value,
        present: bool,
    ) -> Self {
        Self::ListContains {
            pointer: pointer.into(),
            field: field.into(),
            value,
            present,
        }
    }

    /// Returns true when evaluation needs a reconciliation read.
    #[must_use]
    pub const fn needs_store(&self) -> bool {
        matches!(self, Self::RecordMatches { .. } | Self::RecordAbsent { .. })
    }
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status {
                status,
            } => write!(f, "status {status}"),
            Self::GraphqlErrors {
                messages,
            } => write!(f, "graphql errors [{}]", messages.join(" | ")),
            Self::GraphqlRejected => f.write_str("graphql rejection"),
            Self::RecordMatches {
                kind,
                id,
                fields,
            } => {
                let names: Vec<&str> = fields.iter().map(|check| check.field.as_str()).collect();
                write!(f, "{kind}/{id} fields [{}] match", names.join(", "))
            }
            Self::RecordAbsent {
                kind,
                id,
            } => write!(f, "{kind}/{id} absent"),
            Self::ListLen {
                pointer,
                len,
            } => match len {
                ExpectedLen::Exact {
                    len,
                } => write!(f, "{pointer} has {len} entries"),
                ExpectedLen::Relative {
                    baseline,
                    delta,
                } => write!(f, "{pointer} has {baseline}{delta:+} entries"),
            },
            Self::ListContains {
                pointer,
                field,
                value,
                present,
            } => {
                let verb = if *present { "contains" } else { "lacks" };
                write!(f, "{pointer} {verb} {field} = {value}")
            }
        }
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Literal expected vs. observed values of a failed assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Expected value, rendered.
    pub expected: String,
    /// Observed value, rendered.
    pub observed: String,
}

impl Mismatch {
    /// Creates a mismatch.
    #[must_use]
    pub fn new(expected: impl Into<String>, observed: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            observed: observed.into(),
        }
    }
}

/// Verdict of one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Observed matches expected.
    Pass,
    /// Observed diverges from expected.
    Fail(Mismatch),
}

impl Verdict {
    /// Builds a verdict from an equality test.
    fn compare(ok: bool, expected: impl Into<String>, observed: impl Into<String>) -> Self {
        if ok { Self::Pass } else { Self::Fail(Mismatch::new(expected, observed)) }
    }
}

/// Checks an exact status.
#[must_use]
pub fn check_status(expected: u16, outcome: &Outcome) -> Verdict {
    Verdict::compare(outcome.status == expected, expected.to_string(), outcome.status.to_string())
}

/// Checks GraphQL error messages position by position.
#[must_use]
pub fn check_graphql_errors(expected: &[String], outcome: &Outcome) -> Verdict {
    let observed = outcome.graphql_errors();
    let matches = observed.len() >= expected.len()
        && expected.iter().zip(&observed).all(|(want, got)| want == got);
    Verdict::compare(matches, render_messages(expected), render_messages(&observed))
}

/// Checks that at least one GraphQL error was returned.
#[must_use]
pub fn check_graphql_rejected(outcome: &Outcome) -> Verdict {
    let observed = outcome.graphql_errors();
    Verdict::compare(!observed.is_empty(), "at least one graphql error", render_messages(&observed))
}

/// Checks the length of the array at `pointer`.
///
/// # Errors
///
/// Returns [`FixtureError`] when a relative baseline fixture is missing.
pub fn check_list_len(
    pointer: &str,
    len: &ExpectedLen,
    outcome: &Outcome,
    fixtures: &Fixtures,
) -> Result<Verdict, FixtureError> {
    let expected = match len {
        ExpectedLen::Exact {
            len,
        } => i128::try_from(*len).unwrap_or(i128::MAX),
        ExpectedLen::Relative {
            baseline,
            delta,
        } => {
            let base = fixtures
                .get(baseline)
                .and_then(Value::as_u64)
                .ok_or_else(|| FixtureError::Missing(baseline.clone()))?;
            i128::from(base) + i128::from(*delta)
        }
    };
    let Some(items) = outcome.pointer(pointer).and_then(Value::as_array) else {
        let observed = format!("{pointer} is not a list");
        return Ok(Verdict::Fail(Mismatch::new(expected.to_string(), observed)));
    };
    let observed = i128::try_from(items.len()).unwrap_or(i128::MAX);
    Ok(Verdict::compare(observed == expected, expected.to_string(), observed.to_string()))
}

/// Checks list membership of an element whose `field` equals `value`.
#[must_use]
pub fn check_list_contains(
    pointer: &str,
    field: &str,
    value: &Value,
    present: bool,
    outcome: &Outcome,
) -> Verdict {
    let Some(items) = outcome.pointer(pointer).and_then(Value::as_array) else {
        return Verdict::Fail(Mismatch::new(
            format!("{pointer} to be a list"),
            format!("{pointer} is not a list"),
        ));
    };
    let found = items.iter().any(|item| item.get(field) == Some(value));
    let render = |flag: bool| {
        let state = if flag { "present" } else { "absent" };
        format!("{field} = {value} {state}")
    };
    Verdict::compare(found == present, render(present), render(found))
}

/// Compares record fields against their expected values, field by field.
///
/// Every diverging field is reported, not only the first.
#[must_use]
pub fn compare_fields(
    checks: &[FieldCheck],
    outcome: &Outcome,
    record: &ReconciledRecord,
) -> Verdict {
    let mut expected_parts = Vec::new();
    let mut observed_parts = Vec::new();
    for check in checks {
        let want = match &check.source {
            FieldSource::Response(pointer) => outcome.pointer(pointer),
            FieldSource::Literal(value) => Some(value),
        };
        let got = record.field(&check.field);
        let equal = match (want, &got) {
            (Some(want), FieldValue::Present(got)) => want == *got,
            _ => false,
        };
        if !equal {
            expected_parts.push(format!("{} = {}", check.field, render_option(want)));
            observed_parts.push(format!("{} = {}", check.field, render_field(&got)));
        }
    }
    if expected_parts.is_empty() {
        return Verdict::Pass;
    }
    Verdict::Fail(Mismatch::new(expected_parts.join("; "), observed_parts.join("; ")))
}

/// Renders an optional JSON value.
fn render_option(value: Option<&Value>) -> String {
    value.map_or_else(|| MISSING.to_string(), Value::to_string)
}

/// Renders a record field value.
fn render_field(value: &FieldValue<'_>) -> String {
    match value {
        FieldValue::Present(value) => value.to_string(),
        FieldValue::Missing => MISSING.to_string(),
    }
}

/// Renders a list of messages.
fn render_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        return "no graphql errors".to_string();
    }
    format!("[{}]", messages.join(" | "))
}
