// system-tests/src/scenarios/model.rs
// ============================================================================
// Module: Model Mutation Scenarios
// Description: GraphQL model update and delete, reconciled against the store.
// Purpose: Verify mutations read back from the store and reject bad ids.
// Dependencies: conformance-core, serde_json
// ============================================================================

//! ## Overview
//! Both groups note the model ids already listed, upload a model, and then
//! query the model list until an unseen id shows up; that id is captured as a
//! fixture for every scenario.
//! Invariants:
//! - An accepted update reads back field-by-field from the store.
//! - After a delete the record is absent and a repeated delete is rejected.
//! - Only the model uploaded by the group is ever updated or deleted.

use conformance_core::Capture;
use conformance_core::ClassificationError;
use conformance_core::DefectClass;
use conformance_core::ExpectedOutcome;
use conformance_core::FieldCheck;
use conformance_core::RecordKind;
use conformance_core::Request;
use conformance_core::Scenario;
use conformance_core::ScenarioGroup;
use conformance_core::SetupAction;
use conformance_core::Step;
use serde_json::Value;
use serde_json::json;

use super::SuiteContext;
use super::fixture_ref;
use super::uploads::MODEL_FIELD;
use super::uploads::MODEL_UPLOAD_PATH;
use crate::catalog::MODEL_DELETE;
use crate::catalog::MODEL_UPDATE;
use crate::fixtures::FixtureFile;
use crate::graphql::DELETE_MODEL;
use crate::graphql::GRAPHQL_PATH;
use crate::graphql::MODELS;
use crate::graphql::UPDATE_MODEL;
use crate::graphql::delete_model_variables;
use crate::graphql::update_model_variables;

/// Fixture holding the id of the model under test.
pub const MODEL_ID: &str = "model_id";

/// Store collection holding model files.
#[must_use]
pub fn model_records() -> RecordKind {
    RecordKind::new("modelfilemodels")
}

/// Fixture holding the model ids listed before the upload.
const KNOWN_MODEL_IDS: &str = "known_model_ids";

/// Pointer to the model list in a `modelFiles` response.
const MODEL_LIST: &str = "/data/modelFiles";

/// Lists existing models, uploads one, and waits until a new id is listed.
fn model_setup(context: &SuiteContext) -> [SetupAction; 3] {
    let upload = Request::post(MODEL_UPLOAD_PATH)
        .file(MODEL_FIELD, context.file(FixtureFile::LogisticRegressionModel));
    [
        SetupAction::new(Request::graphql(GRAPHQL_PATH, MODELS, None))
            .capture(Capture::values(KNOWN_MODEL_IDS, MODEL_LIST, "id")),
        SetupAction::new(upload),
        SetupAction::new(Request::graphql(GRAPHQL_PATH, MODELS, None))
            .capture(Capture::fresh(MODEL_ID, MODEL_LIST, "id", KNOWN_MODEL_IDS))
            .settle_until_captured(),
    ]
}

/// Builds an `updateModel` request.
fn update(model_file_id: Value, model_file: Value) -> Request {
    Request::graphql(
        GRAPHQL_PATH,
        UPDATE_MODEL,
        Some(update_model_variables(model_file_id, model_file)),
    )
}

/// Builds a `deleteModelFile` request.
fn delete(variables: Value) -> Request {
    Request::graphql(GRAPHQL_PATH, DELETE_MODEL, Some(variables))
}

/// Expects the store record to equal the `updateModel` response.
fn reads_back() -> ExpectedOutcome {
    ExpectedOutcome::record_matches(
        model_records(),
        fixture_ref(MODEL_ID),
        ["name", "modelType", "description"]
            .into_iter()
            .map(|field| FieldCheck::response(field, format!("/data/updateModel/{field}")))
            .collect(),
    )
}

/// Builds the serial model update group.
pub(super) fn update_group(context: &SuiteContext) -> Result<ScenarioGroup, ClassificationError> {
    let model_id = json!(fixture_ref(MODEL_ID));
    let [known, upload, fresh] = model_setup(context);
    let with_status = |status: &str| {
        json!({
            "name": "test2",
            "modelType": "Classification",
            "status": status,
            "description": "test2",
        })
    };
    let valid_inputs =
        json!({ "name": "test2", "modelType": "Classification", "description": "test2" });
    let null_inputs = json!({ "name": null, "modelType": null, "description": null });
    let boolean_inputs = json!({ "name": true, "modelType": true, "description": true });
    let empty_inputs = json!({ "name": "", "modelType": "", "status": "", "description": "" });
    Ok(ScenarioGroup::serial("Update Model")
        .setup(known)
        .setup(upload)
        .setup(fresh)
        .scenario(Scenario::new("Update Model with Valid Model ID").step(
            Step::new(
                "update reads back",
                update(model_id.clone(), valid_inputs),
                reads_back(),
            )
            .hard(),
        ))
        .scenario(Scenario::new("Update Model with Invalid Model ID").step(
            Step::new(
                "null model id",
                update(Value::Null, with_status("true")),
                context.expect(MODEL_UPDATE, Some("modelFileId"), DefectClass::Null)?,
            )
            .hard(),
        ))
        .scenario(Scenario::new("Update Model with Empty Model ID").step(
            Step::new(
                "empty model id",
                update(json!(""), with_status("Pending")),
                context.expect(MODEL_UPDATE, Some("modelFileId"), DefectClass::Empty)?,
            )
            .hard(),
        ))
        .scenario(
            Scenario::new("Update Model with Invalid Inputs")
                .step(
                    Step::new(
                        "null values keep stored fields",
                        update(model_id.clone(), null_inputs),
                        reads_back(),
                    )
                    .hard(),
                )
                .step(
                    Step::new(
                        "boolean values",
                        update(model_id.clone(), boolean_inputs),
                        context.expect(MODEL_UPDATE, Some("modelFile"), DefectClass::WrongType)?,
                    )
                    .hard(),
                ),
        )
        .scenario(Scenario::new("Update Model with Empty Inputs").step(
            Step::new(
                "empty values",
                update(model_id, empty_inputs),
                context.expect(MODEL_UPDATE, Some("modelFile"), DefectClass::Empty)?,
            )
            .hard(),
        )))
}

/// Builds the serial model delete group.
pub(super) fn delete_group(context: &SuiteContext) -> Result<ScenarioGroup, ClassificationError> {
    let model_id = json!(fixture_ref(MODEL_ID));
    let [known, upload, fresh] = model_setup(context);
    let field = Some("deleteModelFileId");
    Ok(ScenarioGroup::serial("Delete Model")
        .setup(known)
        .setup(upload)
        .setup(fresh)
        .scenario(Scenario::new("Delete Model With Valid Model ID").step(
            Step::new(
                "deleted model leaves the store",
                delete(delete_model_variables(model_id.clone())),
                ExpectedOutcome::record_absent(model_records(), fixture_ref(MODEL_ID)),
            )
            .hard(),
        ))
        .scenario(
            Scenario::new("Delete Model with Invalid Model ID")
                .step(
                    Step::new(
                        "null model id",
                        delete(delete_model_variables(Value::Null)),
                        context.expect(MODEL_DELETE, field, DefectClass::Null)?,
                    )
                    .hard(),
                )
                .step(
                    Step::new(
                        "model id not provided",
                        delete(json!({})),
                        context.expect(MODEL_DELETE, field, DefectClass::Missing)?,
                    )
                    .hard(),
                )
                .step(
                    Step::new(
                        "already deleted model id",
                        delete(delete_model_variables(model_id)),
                        context.expect(MODEL_DELETE, field, DefectClass::NonExistent)?,
                    )
                    .hard(),
                ),
        )
        .scenario(Scenario::new("Delete Model with Empty Model ID").step(
            Step::new(
                "empty model id",
                delete(delete_model_variables(json!(""))),
                context.expect(MODEL_DELETE, field, DefectClass::Empty)?,
            )
            .hard(),
        )))
}
