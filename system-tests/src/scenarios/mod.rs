// system-tests/src/scenarios/mod.rs
// ============================================================================
// Module: Conformance Scenarios
// Description: Scenario groups and suites for the application's API surface.
// Purpose: Assemble requests, captures, and catalog expectations into suites.
// Dependencies: conformance-core
// ============================================================================

//! ## Overview
//! Two suites cover the application:
//! - [`api_endpoint_suite`]: REST endpoints (reports, template export,
//!   dataset/model upload, plugins). Steps are soft, mirroring a run that
//!   reports every divergence.
//! - [`graphql_model_suite`]: GraphQL model mutations reconciled against the
//!   backing store. Steps are hard.
//!
//! Invariants:
//! - Expectations come from the outcome catalog; missing entries fail suite
//!   construction with [`ClassificationError::Unclassified`].
//! - Groups sharing application state (plugin list counts, the uploaded
//!   model) are serial; the rest may run concurrently.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod model;
mod plugins;
mod report;
mod template;
mod uploads;


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use conformance_core::ClassificationError;
use conformance_core::DefectClass;
use conformance_core::ExpectedOutcome;
use conformance_core::OutcomeTable;
use conformance_core::Suite;

use crate::catalog;
use crate::fixtures::FixtureCatalog;
use crate::fixtures::FixtureFile;

// ============================================================================
// SECTION: Context
// ============================================================================

/// Inputs every scenario builder reads.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    /// Outcome classification table.
    table: OutcomeTable,
    /// Fixture file locations.
    fixtures: FixtureCatalog,
}

impl SuiteContext {
    /// Creates a context over the application's catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError`] if the catalog is inconsistent.
    pub fn new(fixtures: FixtureCatalog) -> Result<Self, ClassificationError> {
        Ok(Self::with_table(catalog::outcome_table()?, fixtures))
    }

    /// Creates a context over an explicit table.
    #[must_use]
    pub const fn with_table(table: OutcomeTable, fixtures: FixtureCatalog) -> Self {
        Self {
            table,
            fixtures,
        }
    }

    /// Returns the classification table.
    #[must_use]
    pub const fn table(&self) -> &OutcomeTable {
        &self.table
    }

    /// Looks an expectation up in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError::Unclassified`] when no entry exists.
    pub fn expect(
        &self,
        operation: &str,
        field: Option<&str>,
        defect: DefectClass,
    ) -> Result<ExpectedOutcome, ClassificationError> {
        self.table.expect(operation, field, defect)
    }

    /// Returns the path of a fixture file.
    #[must_use]
    pub fn file(&self, file: FixtureFile) -> PathBuf {
        self.fixtures.path(file)
    }
}

/// Returns the `${name}` placeholder for a fixture.
#[must_use]
pub fn fixture_ref(name: &str) -> String {
    format!("${{{name}}}")
}

// ============================================================================
// SECTION: Suites
// ============================================================================

/// REST endpoint suite; groups run concurrently.
///
/// # Errors
///
/// Returns [`ClassificationError::Unclassified`] when a step has no catalog entry.
pub fn api_endpoint_suite(context: &SuiteContext) -> Result<Suite, ClassificationError> {
    Ok(Suite::new("API Endpoints")
        .group(report::group(context)?)
        .group(template::group(context)?)
        .group(uploads::dataset_group(context)?)
        .group(uploads::model_group(context)?)
        .group(plugins::group(context)?)
        .concurrent_groups()
        .flag_discrepancies(context.table.discrepancies()))
}

/// GraphQL model mutation suite; groups run in order.
///
/// The delete group removes a model the update group may still be reading,
/// so the groups never overlap.
///
/// # Errors
///
/// Returns [`ClassificationError::Unclassified`] when a step has no catalog entry.
pub fn graphql_model_suite(context: &SuiteContext) -> Result<Suite, ClassificationError> {
    Ok(Suite::new("GraphQL Model Mutations")
        .group(model::update_group(context)?)
        .group(model::delete_group(context)?))
}

pub use model::MODEL_ID;
pub use model::model_records;
pub use plugins::PLUGIN_BASELINE_FIXTURE;
pub use plugins::PLUGIN_GID;
pub use report::PROJECT_ID;
pub use template::TEMPLATE_ID;
