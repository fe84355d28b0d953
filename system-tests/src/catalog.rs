// system-tests/src/catalog.rs
// ============================================================================
// Module: Outcome Catalog
// Description: Expected statuses and GraphQL messages of the application.
// Purpose: Keep every literal expectation in one classification table.
// Dependencies: conformance-core, serde_json
// ============================================================================

//! ## Overview
//! The catalog maps (operation, field, defect class) to the outcome the
//! application is known to return. Scenarios look expectations up here and
//! never inline a status or message.
//!
//! Sibling fields of template export disagree for the wrong-type and
//! non-existent defect classes (`templateId` yields 500 where `pluginGID` and
//! `templateCID` yield 200). Both are kept as observed and surface through
//! [`OutcomeTable::discrepancies`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use conformance_core::ClassificationError;
use conformance_core::DefectClass;
use conformance_core::ExpectedOutcome;
use conformance_core::OutcomeKey;
use conformance_core::OutcomeTable;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// `GET /api/report/{projectId}`.
pub const REPORT_GET: &str = "report.get";
/// `POST /api/template/export`.
pub const TEMPLATE_EXPORT: &str = "template.export";
/// `POST /api/upload/data`.
pub const DATASET_UPLOAD: &str = "dataset.upload";
/// `POST /api/upload/model`.
pub const MODEL_UPLOAD: &str = "model.upload";
/// `POST /api/plugins/list`.
pub const PLUGINS_LIST: &str = "plugins.list";
/// `POST /api/plugins/upload`.
pub const PLUGINS_UPLOAD: &str = "plugins.upload";
/// `DELETE /api/plugins/delete/{gid}`.
pub const PLUGINS_DELETE: &str = "plugins.delete";
/// GraphQL `updateModel`.
pub const MODEL_UPDATE: &str = "model.update";
/// GraphQL `deleteModelFile`.
pub const MODEL_DELETE: &str = "model.delete";

/// Plugins installed on a fresh deployment.
pub const PLUGIN_BASELINE: usize = 10;

// ============================================================================
// SECTION: GraphQL Messages
// ============================================================================

/// `modelFileId` sent as null.
pub const MSG_MODEL_ID_NULL: &str =
    r#"Variable "$modelFileId" of non-null type "ObjectID!" must not be null."#;
/// `modelFileId` sent as an empty string.
pub const MSG_MODEL_ID_EMPTY: &str = concat!(
    r#"Variable "$modelFileId" got invalid value ""; "#,
    "Value is not a valid mongodb object id of form: ",
);
/// `modelFile` carrying an undefined `status` field next to valid values.
pub const MSG_MODEL_STATUS_UNDEFINED: &str = concat!(
    r#"Variable "$modelFile" got invalid value { name: "test2", modelType: "Classification", "#,
    r#"status: "true", description: "test2" }; "#,
    r#"Field "status" is not defined by type "ModelFileInput"."#,
);
/// `modelFile` values sent as booleans.
pub const MSG_MODEL_TYPE_NOT_STRING: &str = concat!(
    r#"Variable "$modelFile" got invalid value true at "modelFile.modelType"; "#,
    r#"Enum "ModelType" cannot represent non-string value: true."#,
);
/// `modelFile.modelType` sent as an empty string.
pub const MSG_MODEL_TYPE_EMPTY: &str = concat!(
    r#"Variable "$modelFile" got invalid value "" at "modelFile.modelType"; "#,
    r#"Value "" does not exist in "ModelType" enum."#,
);
/// `modelFile` carrying an undefined `status` field with empty values.
pub const MSG_MODEL_STATUS_UNDEFINED_EMPTY: &str = concat!(
    r#"Variable "$modelFile" got invalid value "#,
    r#"{ name: "", modelType: "", status: "", description: "" }; "#,
    r#"Field "status" is not defined by type "ModelFileInput"."#,
);
/// `deleteModelFileId` sent as null.
pub const MSG_DELETE_ID_NULL: &str =
    r#"Variable "$deleteModelFileId" of non-null type "ObjectID!" must not be null."#;
/// `deleteModelFileId` omitted.
pub const MSG_DELETE_ID_MISSING: &str =
    r#"Variable "$deleteModelFileId" of required type "ObjectID!" was not provided."#;
/// `deleteModelFileId` sent as an empty string.
pub const MSG_DELETE_ID_EMPTY: &str = concat!(
    r#"Variable "$deleteModelFileId" got invalid value ""; "#,
    "Value is not a valid mongodb object id of form: ",
);

// ============================================================================
// SECTION: Table
// ============================================================================

/// Template export form fields.
pub const TEMPLATE_FIELDS: [&str; 3] = ["templateId", "pluginGID", "templateCID"];

/// Builds the application's outcome classification table.
///
/// # Errors
///
/// Returns [`ClassificationError::Duplicate`] if an entry is declared twice.
pub fn outcome_table() -> Result<OutcomeTable, ClassificationError> {
    let mut table = OutcomeTable::new();
    report_entries(&mut table)?;
    template_entries(&mut table)?;
    upload_entries(&mut table)?;
    plugin_entries(&mut table)?;
    model_entries(&mut table)?;
    Ok(table)
}

/// Report retrieval.
fn report_entries(table: &mut OutcomeTable) -> Result<(), ClassificationError> {
    table.status(REPORT_GET, None, DefectClass::Valid, 200)?;
    // Project exists but its report was never generated.
    table.status(REPORT_GET, None, DefectClass::NonExistent, 400)?;
    table.status(REPORT_GET, Some("projectId"), DefectClass::Malformed, 400)?;
    table.status(REPORT_GET, Some("projectId"), DefectClass::Empty, 404)
}

/// Template export, one row per (field, defect).
fn template_entries(table: &mut OutcomeTable) -> Result<(), ClassificationError> {
    table.status(TEMPLATE_EXPORT, None, DefectClass::Valid, 200)?;
    let rows: [(&str, DefectClass, u16); 12] = [
        ("templateId", DefectClass::NonExistent, 500),
        ("templateId", DefectClass::Null, 400),
        ("templateId", DefectClass::WrongType, 500),
        ("templateId", DefectClass::Empty, 400),
        ("pluginGID", DefectClass::NonExistent, 200),
        ("pluginGID", DefectClass::Null, 400),
        ("pluginGID", DefectClass::WrongType, 200),
        ("pluginGID", DefectClass::Empty, 400),
        ("templateCID", DefectClass::NonExistent, 200),
        ("templateCID", DefectClass::Null, 400),
        ("templateCID", DefectClass::WrongType, 200),
        ("templateCID", DefectClass::Empty, 400),
    ];
    for (field, defect, status) in rows {
        table.status(TEMPLATE_EXPORT, Some(field), defect, status)?;
    }
    Ok(())
}

/// Dataset and model uploads.
fn upload_entries(table: &mut OutcomeTable) -> Result<(), ClassificationError> {
    for (operation, field) in [(DATASET_UPLOAD, "myFiles"), (MODEL_UPLOAD, "myModelFiles")] {
        table.status(operation, Some(field), DefectClass::Valid, 201)?;
        table.status(operation, Some(field), DefectClass::Malformed, 400)?;
        table.status(operation, Some(field), DefectClass::Empty, 500)?;
        table.status(operation, Some(field), DefectClass::UnsupportedFormat, 400)?;
    }
    Ok(())
}

/// Plugin list, upload, and delete.
fn plugin_entries(table: &mut OutcomeTable) -> Result<(), ClassificationError> {
    table.insert(
        OutcomeKey::new(PLUGINS_LIST, None, DefectClass::Valid),
        ExpectedOutcome::list_len("/plugins", PLUGIN_BASELINE),
    )?;
    table.status(PLUGINS_UPLOAD, Some("myFile"), DefectClass::Valid, 200)?;
    table.status(PLUGINS_UPLOAD, Some("myFile"), DefectClass::UnsupportedFormat, 400)?;
    table.status(PLUGINS_UPLOAD, Some("myFile"), DefectClass::Corrupted, 400)?;
    table.status(PLUGINS_DELETE, Some("gid"), DefectClass::Valid, 200)?;
    table.status(PLUGINS_DELETE, Some("gid"), DefectClass::NonExistent, 400)
}

/// GraphQL model mutations.
fn model_entries(table: &mut OutcomeTable) -> Result<(), ClassificationError> {
    table.insert(
        OutcomeKey::new(MODEL_UPDATE, Some("modelFileId"), DefectClass::Null),
        ExpectedOutcome::graphql_errors([MSG_MODEL_ID_NULL, MSG_MODEL_STATUS_UNDEFINED]),
    )?;
    table.insert(
        OutcomeKey::new(MODEL_UPDATE, Some("modelFileId"), DefectClass::Empty),
        ExpectedOutcome::graphql_errors([MSG_MODEL_ID_EMPTY]),
    )?;
    table.insert(
        OutcomeKey::new(MODEL_UPDATE, Some("modelFile"), DefectClass::WrongType),
        ExpectedOutcome::graphql_errors([MSG_MODEL_TYPE_NOT_STRING]),
    )?;
    table.insert(
        OutcomeKey::new(MODEL_UPDATE, Some("modelFile"), DefectClass::Empty),
        ExpectedOutcome::graphql_errors([MSG_MODEL_TYPE_EMPTY, MSG_MODEL_STATUS_UNDEFINED_EMPTY]),
    )?;
    table.insert(
        OutcomeKey::new(MODEL_DELETE, Some("deleteModelFileId"), DefectClass::Null),
        ExpectedOutcome::graphql_errors([MSG_DELETE_ID_NULL]),
    )?;
    table.insert(
        OutcomeKey::new(MODEL_DELETE, Some("deleteModelFileId"), DefectClass::Missing),
        ExpectedOutcome::graphql_errors([MSG_DELETE_ID_MISSING]),
    )?;
    table.insert(
        OutcomeKey::new(MODEL_DELETE, Some("deleteModelFileId"), DefectClass::Empty),
        ExpectedOutcome::graphql_errors([MSG_DELETE_ID_EMPTY]),
    )?;
    table.insert(
        OutcomeKey::new(MODEL_DELETE, Some("deleteModelFileId"), DefectClass::NonExistent),
        ExpectedOutcome::GraphqlRejected,
    )
}
