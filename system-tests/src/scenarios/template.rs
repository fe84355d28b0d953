// system-tests/src/scenarios/template.rs
// ============================================================================
// Module: Template Export Scenarios
// Description: Export a project template as a plugin with defective fields.
// Purpose: Cover `POST /api/template/export` one form field at a time.
// Dependencies: conformance-core, serde_json
// ============================================================================

//! ## Overview
//! Each defective request changes exactly one form field and keeps the other
//! two valid, so the catalog entry keyed by that field decides the outcome.

use conformance_core::Capture;
use conformance_core::ClassificationError;
use conformance_core::DefectClass;
use conformance_core::Request;
use conformance_core::Scenario;
use conformance_core::ScenarioGroup;
use conformance_core::SetupAction;
use conformance_core::Step;
use serde_json::Value;
use serde_json::json;

use super::SuiteContext;
use super::fixture_ref;
use crate::catalog::TEMPLATE_EXPORT;
use crate::catalog::TEMPLATE_FIELDS;
use crate::graphql::CREATE_PROJECT_TEMPLATE;
use crate::graphql::GRAPHQL_PATH;
use crate::graphql::project_template_variables;

/// Fixture holding the id of the template created in group setup.
pub const TEMPLATE_ID: &str = "template_id";

/// Template export path.
const EXPORT_PATH: &str = "/api/template/export";
/// Plugin gid accepted by the export.
const VALID_PLUGIN_GID: &str = "cd743373-b5bb-4b6c-98e3-2a36a7d5f6b5";
/// Template cid accepted by the export.
const VALID_TEMPLATE_CID: &str = "project-0-5598544214335246";
/// Well-formed value referring to nothing.
const UNKNOWN_VALUE: &str = "123";

/// Report label of a form field.
fn label(field: &str) -> &str {
    match field {
        "templateId" => "Template ID",
        "pluginGID" => "Plugin GID",
        "templateCID" => "Template CID",
        other => other,
    }
}

/// Builds an export request with `field` replaced by `value`.
fn export(field: Option<&str>, value: &Value) -> Request {
    let fields = TEMPLATE_FIELDS.map(|name| {
        let valid = match name {
            "templateId" => json!(fixture_ref(TEMPLATE_ID)),
            "pluginGID" => json!(VALID_PLUGIN_GID),
            _ => json!(VALID_TEMPLATE_CID),
        };
        let sent = if field == Some(name) { value.clone() } else { valid };
        (name, sent)
    });
    Request::post(EXPORT_PATH).form_values(fields)
}

/// Builds the serial template export group.
pub(super) fn group(context: &SuiteContext) -> Result<ScenarioGroup, ClassificationError> {
    let create_template = SetupAction::new(Request::graphql(
        GRAPHQL_PATH,
        CREATE_PROJECT_TEMPLATE,
        Some(project_template_variables()),
    ))
    .capture(Capture::pointer(TEMPLATE_ID, "/data/createProjectTemplate/id"));

    let mut group = ScenarioGroup::serial("Export As Plugin").setup(create_template).scenario(
        Scenario::new("Export As Plugin with Valid Inputs").step(Step::new(
            "valid inputs",
            export(None, &Value::Null),
            context.expect(TEMPLATE_EXPORT, None, DefectClass::Valid)?,
        )),
    );

    for field in TEMPLATE_FIELDS {
        let invalid = [
            (DefectClass::NonExistent, json!(UNKNOWN_VALUE)),
            (DefectClass::Null, Value::Null),
            (DefectClass::WrongType, json!(true)),
        ];
        let mut scenario = Scenario::new(format!("Export As Plugin with Invalid {}", label(field)));
        for (defect, value) in invalid {
            scenario = scenario.step(Step::new(
                format!("{field} {defect}"),
                export(Some(field), &value),
                context.expect(TEMPLATE_EXPORT, Some(field), defect)?,
            ));
        }
        let empty_step = Step::new(
            format!("{field} empty"),
            export(Some(field), &json!("")),
            context.expect(TEMPLATE_EXPORT, Some(field), DefectClass::Empty)?,
        );
        let empty =
            Scenario::new(format!("Export As Plugin with Empty {}", label(field))).step(empty_step);
        group = group.scenario(scenario).scenario(empty);
    }
    Ok(group)
}
