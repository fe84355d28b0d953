// system-tests/src/scenarios/plugins.rs
// ============================================================================
// Module: Plugin Scenarios
// Description: Plugin listing, upload, and deletion.
// Purpose: Check that the plugin list tracks uploads and deletions exactly.
// Dependencies: conformance-core, serde_json
// ============================================================================

//! ## Overview
//! Listing, upload, and deletion share one serial group: the list size after
//! an upload depends on the upload having completed, and deletion depends on
//! the uploaded plugin. The group captures the list size once as a baseline.
//! Invariants:
//! - After the valid upload the list holds `baseline + 1` plugins.
//! - After deleting that plugin the list is back at `baseline`.

use conformance_core::Capture;
use conformance_core::ClassificationError;
use conformance_core::DefectClass;
use conformance_core::ExpectedOutcome;
use conformance_core::Request;
use conformance_core::Scenario;
use conformance_core::ScenarioGroup;
use conformance_core::SetupAction;
use conformance_core::Step;
use serde_json::json;

use super::SuiteContext;
use crate::catalog::PLUGINS_DELETE;
use crate::catalog::PLUGINS_LIST;
use crate::catalog::PLUGINS_UPLOAD;
use crate::fixtures::FixtureFile;

/// Fixture holding the plugin count before any upload.
pub const PLUGIN_BASELINE_FIXTURE: &str = "plugin_baseline";
/// Global id of the plugin archive uploaded by the group.
pub const PLUGIN_GID: &str = "partial_dependence_plot-0.1.0";
/// Stock plugin id that is not installed.
const MISSING_PLUGIN_GID: &str = "aiverify.stock.process-checklist";

/// Plugin listing path.
const LIST_PATH: &str = "/api/plugins/list";
/// Plugin archive upload path.
const UPLOAD_PATH: &str = "/api/plugins/upload";
/// Multipart field carrying plugin archives.
const UPLOAD_FIELD: &str = "myFile";
/// Pointer to the plugin array in a listing.
const PLUGINS_POINTER: &str = "/plugins";

/// Builds a plugin listing request.
fn list() -> Request {
    Request::post(LIST_PATH)
}

/// Builds a plugin delete request for `gid`.
fn delete(gid: &str) -> Request {
    Request::delete(format!("/api/plugins/delete/{gid}"))
}

/// Builds the serial plugin group.
pub(super) fn group(context: &SuiteContext) -> Result<ScenarioGroup, ClassificationError> {
    let baseline = SetupAction::new(list())
        .capture(Capture::length(PLUGIN_BASELINE_FIXTURE, PLUGINS_POINTER));
    let upload =
        |file: FixtureFile| Request::post(UPLOAD_PATH).file(UPLOAD_FIELD, context.file(file));

    Ok(ScenarioGroup::serial("Plugins")
        .setup(baseline)
        .scenario(Scenario::new("List All Plugins").step(Step::new(
            "stock plugin count",
            list(),
            context.expect(PLUGINS_LIST, None, DefectClass::Valid)?,
        )))
        .scenario(
            Scenario::new("Upload Plugins")
                .step(
                    Step::new(
                        "upload plugin archive",
                        upload(FixtureFile::PartialDependencePlugin),
                        context.expect(PLUGINS_UPLOAD, Some(UPLOAD_FIELD), DefectClass::Valid)?,
                    )
                    .hard(),
                )
                .step(Step::new(
                    "list grows by one",
                    list(),
                    ExpectedOutcome::list_len_delta(PLUGINS_POINTER, PLUGIN_BASELINE_FIXTURE, 1),
                ))
                .step(Step::new(
                    "uploaded plugin is listed",
                    list(),
                    ExpectedOutcome::list_contains(PLUGINS_POINTER, "gid", json!(PLUGIN_GID), true),
                )),
        )
        .scenario(Scenario::new("Upload Invalid File").step(Step::new(
            "upload shell script",
            upload(FixtureFile::ShellScript),
            context.expect(PLUGINS_UPLOAD, Some(UPLOAD_FIELD), DefectClass::UnsupportedFormat)?,
        )))
        .scenario(Scenario::new("Corrupted Plugin Meta JSON File").step(Step::new(
            "upload corrupted archive",
            upload(FixtureFile::CorruptedChecklistPlugin),
            context.expect(PLUGINS_UPLOAD, Some(UPLOAD_FIELD), DefectClass::Corrupted)?,
        )))
        .scenario(
            Scenario::new("Delete Plugin by Plugin GID")
                .step(
                    Step::new(
                        "delete uploaded plugin",
                        delete(PLUGIN_GID),
                        context.expect(PLUGINS_DELETE, Some("gid"), DefectClass::Valid)?,
                    )
                    .hard(),
                )
                .step(Step::new(
                    "deleted plugin is not listed",
                    list(),
                    ExpectedOutcome::list_contains(
                        PLUGINS_POINTER,
                        "gid",
                        json!(PLUGIN_GID),
                        false,
                    ),
                ))
                .step(Step::new(
                    "list back at baseline",
                    list(),
                    ExpectedOutcome::list_len_delta(PLUGINS_POINTER, PLUGIN_BASELINE_FIXTURE, 0),
                )),
        )
        .scenario(Scenario::new("Delete Plugin with Non-existing Plugin GID").step(Step::new(
            "delete missing plugin",
            delete(MISSING_PLUGIN_GID),
            context.expect(PLUGINS_DELETE, Some("gid"), DefectClass::NonExistent)?,
        ))))
}
