// system-tests/src/graphql.rs
// ============================================================================
// Module: GraphQL Documents
// Description: Query and mutation documents sent to the GraphQL endpoint.
// Purpose: Keep raw GraphQL text and fixed variables out of scenario code.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Documents are sent verbatim as the `query` member of the request body.
//! Variable builders return JSON that may reference fixtures with `${name}`.

use serde_json::Value;
use serde_json::json;

/// Path of the GraphQL endpoint.
pub const GRAPHQL_PATH: &str = "/api/graphql";

/// Creates a project and returns its id.
pub const CREATE_PROJECT: &str = r"mutation CreateProject($project: ProjectInput!) {
  createProject(project: $project) {
    id
    projectInfo {
      name
    }
  }
}";

/// Lists projects with their generated report.
pub const GET_REPORTS: &str = r"query Projects {
  projects {
    id
    report {
      projectID
      status
    }
  }
}";

/// Creates a project template and returns its id.
pub const CREATE_PROJECT_TEMPLATE: &str =
    r"mutation CreateProjectTemplate($projectTemplate: ProjectTemplateInput!) {
  createProjectTemplate(projectTemplate: $projectTemplate) {
    id
    fromPlugin
    projectInfo {
      name
    }
  }
}";

/// Lists uploaded model files.
pub const MODELS: &str = r"query ModelFiles {
  modelFiles {
    id
    name
    modelType
    description
    status
  }
}";

/// Updates model file metadata.
pub const UPDATE_MODEL: &str =
    r"mutation UpdateModel($modelFileId: ObjectID!, $modelFile: ModelFileInput!) {
  updateModel(modelFileID: $modelFileId, modelFile: $modelFile) {
    id
    name
    modelType
    description
  }
}";

/// Deletes a model file.
pub const DELETE_MODEL: &str = r"mutation DeleteModelFile($deleteModelFileId: ObjectID!) {
  deleteModelFile(id: $deleteModelFileId)
}";

/// Variables of [`CREATE_PROJECT`].
#[must_use]
pub fn project_variables() -> Value {
    json!({
        "project": {
            "projectInfo": {
                "name": "Conformance Project",
                "description": "Project created by the conformance suite",
                "reportTitle": "Conformance Report",
                "company": "Conformance"
            },
            "globalVars": [],
            "pages": []
        }
    })
}

/// Variables of [`CREATE_PROJECT_TEMPLATE`].
#[must_use]
pub fn project_template_variables() -> Value {
    json!({
        "projectTemplate": {
            "projectInfo": {
                "name": "Conformance Template",
                "description": "Template created by the conformance suite",
                "reportTitle": "",
                "company": ""
            },
            "globalVars": [],
            "pages": []
        }
    })
}

/// Variables of [`UPDATE_MODEL`].
#[must_use]
pub fn update_model_variables(model_file_id: Value, model_file: Value) -> Value {
    json!({ "modelFileId": model_file_id, "modelFile": model_file })
}

/// Variables of [`DELETE_MODEL`].
#[must_use]
pub fn delete_model_variables(id: Value) -> Value {
    json!({ "deleteModelFileId": id })
}
