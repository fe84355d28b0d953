// system-tests/src/scenarios/uploads.rs
// ============================================================================
// Module: Upload Scenarios
// Description: Dataset and model multipart uploads.
// Purpose: Cover valid, invalid, empty, and unsupported upload payloads.
// Dependencies: conformance-core
// ============================================================================

//! ## Overview
//! Each upload endpoint gets one single-step scenario per payload class.
//! The scenarios share no fixtures and run concurrently.

use conformance_core::ClassificationError;
use conformance_core::DefectClass;
use conformance_core::Request;
use conformance_core::Scenario;
use conformance_core::ScenarioGroup;
use conformance_core::Step;

use super::SuiteContext;
use crate::catalog::DATASET_UPLOAD;
use crate::catalog::MODEL_UPLOAD;
use crate::fixtures::FixtureFile;

/// Multipart field carrying datasets.
const DATASET_FIELD: &str = "myFiles";
/// Multipart field carrying models.
pub(super) const MODEL_FIELD: &str = "myModelFiles";
/// Model upload path.
pub(super) const MODEL_UPLOAD_PATH: &str = "/api/upload/model";

/// One upload endpoint and the files that exercise it.
struct UploadTarget<'a> {
    /// Group name.
    group: &'a str,
    /// Payload noun used in scenario names.
    noun: &'a str,
    /// Catalog operation.
    operation: &'a str,
    /// Endpoint path.
    path: &'a str,
    /// Multipart field name.
    field: &'a str,
    /// File the endpoint accepts.
    valid: FixtureFile,
    /// File of the right extension with unusable content.
    invalid: FixtureFile,
}

/// Builds the concurrent dataset upload group.
pub(super) fn dataset_group(
    context: &SuiteContext,
) -> Result<ScenarioGroup, ClassificationError> {
    upload_group(
        context,
        &UploadTarget {
            group: "Upload Dataset",
            noun: "Dataset",
            operation: DATASET_UPLOAD,
            path: "/api/upload/data",
            field: DATASET_FIELD,
            valid: FixtureFile::CreditDataset,
            invalid: FixtureFile::PickledLoanDataset,
        },
    )
}

/// Builds the concurrent model upload group.
pub(super) fn model_group(
    context: &SuiteContext,
) -> Result<ScenarioGroup, ClassificationError> {
    // No known-bad model file exists yet, so the script doubles as one.
    upload_group(
        context,
        &UploadTarget {
            group: "Upload Model",
            noun: "Model",
            operation: MODEL_UPLOAD,
            path: MODEL_UPLOAD_PATH,
            field: MODEL_FIELD,
            valid: FixtureFile::LogisticRegressionModel,
            invalid: FixtureFile::ShellScript,
        },
    )
}

/// One single-step scenario per payload class, run concurrently.
fn upload_group(
    context: &SuiteContext,
    target: &UploadTarget<'_>,
) -> Result<ScenarioGroup, ClassificationError> {
    let noun = target.noun;
    let with_file =
        |file: FixtureFile| Request::post(target.path).file(target.field, context.file(file));
    let cases = [
        (
            format!("Upload {noun} with Valid {noun}"),
            with_file(target.valid),
            DefectClass::Valid,
        ),
        (
            format!("Upload {noun} with Invalid {noun}"),
            with_file(target.invalid),
            DefectClass::Malformed,
        ),
        (
            format!("Upload {noun} with Empty {noun}"),
            Request::post(target.path).empty_multipart(),
            DefectClass::Empty,
        ),
        (
            format!("Upload Unsupported File Format {noun}"),
            with_file(FixtureFile::ShellScript),
            DefectClass::UnsupportedFormat,
        ),
    ];
    let mut group = ScenarioGroup::concurrent(target.group);
    for (name, request, defect) in cases {
        let expected = context.expect(target.operation, Some(target.field), defect)?;
        let step = Step::new(format!("{} {defect}", target.field), request, expected);
        group = group.scenario(Scenario::new(name).step(step));
    }
    Ok(group)
}
