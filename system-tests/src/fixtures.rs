// system-tests/src/fixtures.rs
// ============================================================================
// Module: Fixture Files
// Description: Sample upload files the suites stream from disk.
// Purpose: Name every fixture file once and resolve it under one directory.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Fixture files are supplied by the operator; the harness never generates
//! them. [`FixtureCatalog::verify`] checks that every file is present before a
//! live run so a missing file fails fast instead of as a step failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Files
// ============================================================================

/// Sample files used by upload scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureFile {
    /// Valid tabular dataset.
    CreditDataset,
    /// Pickle the dataset endpoint rejects.
    PickledLoanDataset,
    /// Shell script; an unsupported format everywhere.
    ShellScript,
    /// Valid scikit-learn model.
    LogisticRegressionModel,
    /// Valid plugin archive.
    PartialDependencePlugin,
    /// Plugin archive with corrupted metadata.
    CorruptedChecklistPlugin,
}

impl FixtureFile {
    /// Every fixture file.
    pub const ALL: [Self; 6] = [
        Self::CreditDataset,
        Self::PickledLoanDataset,
        Self::ShellScript,
        Self::LogisticRegressionModel,
        Self::PartialDependencePlugin,
        Self::CorruptedChecklistPlugin,
    ];

    /// Returns the file name inside the fixture directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::CreditDataset => "sample_bc_credit_data.sav",
            Self::PickledLoanDataset => "pickle_pandas_tabular_loan_testing.sav",
            Self::ShellScript => "combine_all.sh",
            Self::LogisticRegressionModel => {
                "sample_bc_credit_sklearn_linear.LogisticRegression.sav"
            }
            Self::PartialDependencePlugin => "partial_dependence_plot-0.1.0.zip",
            Self::CorruptedChecklistPlugin => "aiverify.stock.process-checklist-corrupted.zip",
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Fixture verification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureFileError {
    /// One or more files are absent.
    #[error("fixture files missing under {dir}: {files}")]
    Missing {
        /// Fixture directory.
        dir: String,
        /// Comma-separated missing file names.
        files: String,
    },
}

/// Resolves fixture files under one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCatalog {
    /// Fixture directory.
    root: PathBuf,
}

impl FixtureCatalog {
    /// Creates a catalog rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Returns the fixture directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of `file`.
    #[must_use]
    pub fn path(&self, file: FixtureFile) -> PathBuf {
        self.root.join(file.file_name())
    }

    /// Checks that every fixture file exists.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureFileError::Missing`] listing every absent file.
    pub fn verify(&self) -> Result<(), FixtureFileError> {
        let missing: Vec<&str> = FixtureFile::ALL
            .iter()
            .filter(|file| !self.path(**file).is_file())
            .map(|file| file.file_name())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(FixtureFileError::Missing {
            dir: self.root.display().to_string(),
            files: missing.join(", "),
        })
    }
}
