// crates/conformance-core/src/runtime/mod.rs
// ============================================================================
// Module: Conformance Runtime
// Description: Scenario model, runner, settle policies, and reports.
// Purpose: Execute declarative scenarios against the configured seams.
// Dependencies: crate::core, crate::interfaces, tokio, tracing
// ============================================================================

//! ## Overview
//! Runtime layer of the harness. [`Harness`] is the single entry point; all
//! other types are plain data or pure helpers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod memory_store;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod wait;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use memory_store::InMemoryRecordStore;
pub use report::GroupReport;
pub use report::ScenarioReport;
pub use report::ScenarioState;
pub use report::StepReport;
pub use report::StepStatus;
pub use report::StepTally;
pub use report::SuiteReport;
pub use runner::DEFAULT_STEP_TIMEOUT;
pub use runner::Harness;
pub use scenario::GroupMode;
pub use scenario::Scenario;
pub use scenario::ScenarioGroup;
pub use scenario::SetupAction;
pub use scenario::Step;
pub use scenario::Suite;
pub use wait::MIN_BACKOFF_DELAY;
pub use wait::Settled;
pub use wait::WaitPolicy;
