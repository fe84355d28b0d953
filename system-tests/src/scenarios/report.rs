// system-tests/src/scenarios/report.rs
// ============================================================================
// Module: Report Scenarios
// Description: Report retrieval before and after generation.
// Purpose: Cover `GET /api/report/{projectId}` across id defects.
// Dependencies: conformance-core
// ============================================================================

//! ## Overview
//! Group setup creates a project; the scenarios read its report before
//! generation, read an already generated report, and send malformed ids.

use conformance_core::Capture;
use conformance_core::ClassificationError;
use conformance_core::DefectClass;
use conformance_core::Request;
use conformance_core::Scenario;
use conformance_core::ScenarioGroup;
use conformance_core::SetupAction;
use conformance_core::Step;

use super::SuiteContext;
use super::fixture_ref;
use crate::catalog::REPORT_GET;
use crate::graphql::CREATE_PROJECT;
use crate::graphql::GET_REPORTS;
use crate::graphql::GRAPHQL_PATH;
use crate::graphql::project_variables;

/// Fixture holding the id of the project created in group setup.
pub const PROJECT_ID: &str = "project_id";
/// Fixture holding the project id of an already generated report.
const GENERATED_PROJECT_ID: &str = "generated_project_id";

/// Well-formed hex, one character short of an object id.
const SHORT_PROJECT_ID: &str = "6416da997de481f468cd535";

/// Builds the report path for `project_id`.
fn report_path(project_id: &str) -> String {
    format!("/api/report/{project_id}")
}

/// Builds the serial report group.
pub(super) fn group(context: &SuiteContext) -> Result<ScenarioGroup, ClassificationError> {
    let create_project =
        SetupAction::new(Request::graphql(GRAPHQL_PATH, CREATE_PROJECT, Some(project_variables())))
            .capture(Capture::pointer(PROJECT_ID, "/data/createProject/id"));
    let generated_report = SetupAction::new(Request::graphql(GRAPHQL_PATH, GET_REPORTS, None))
        .capture(Capture::pointer(GENERATED_PROJECT_ID, "/data/projects/0/report/projectID"))
        .settle_until_captured();

    Ok(ScenarioGroup::serial("Get Report")
        .setup(create_project)
        .scenario(Scenario::new("Get Non-Generated Report with Valid Project ID").step(Step::new(
            "report requested before generation",
            Request::get(report_path(&fixture_ref(PROJECT_ID))),
            context.expect(REPORT_GET, None, DefectClass::NonExistent)?,
        )))
        .scenario(
            Scenario::new("Get Generated Report with Valid Project ID")
                .setup(generated_report)
                .step(Step::new(
                    "generated report",
                    Request::get(report_path(&fixture_ref(GENERATED_PROJECT_ID))),
                    context.expect(REPORT_GET, None, DefectClass::Valid)?,
                )),
        )
        .scenario(Scenario::new("Get Generated Report with Invalid Project ID").step(Step::new(
            "short project id",
            Request::get(report_path(SHORT_PROJECT_ID)),
            context.expect(REPORT_GET, Some("projectId"), DefectClass::Malformed)?,
        )))
        .scenario(Scenario::new("Get Generated Report with Empty Project ID").step(Step::new(
            "blank project id",
            Request::get(report_path(" ")),
            context.expect(REPORT_GET, Some("projectId"), DefectClass::Empty)?,
        ))))
}
