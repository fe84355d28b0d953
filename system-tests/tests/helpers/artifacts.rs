// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Run Artifacts
// Description: Per-run report, transcript, and summary files.
// Purpose: Leave a readable record of every live suite run, pass or fail.
// Dependencies: system-tests, conformance-core, conformance-http, serde, serde_jcs
// ============================================================================

//! ## Overview
//! Each suite binary owns one run directory. The reporter writes the suite
//! report and HTTP transcript there, then a summary; a reporter dropped
//! without a summary records a panic or error status instead.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use conformance_core::SuiteReport;
use conformance_http::TranscriptEntry;
use serde::Serialize;
use system_tests::config::SystemTestConfig;

/// Report file names, in write order.
const SUITE_FILES: [&str; 3] = ["report.json", "report.md", "transcript.json"];

/// Final status of a suite run.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every step passed.
    Pass,
    /// At least one step did not pass.
    Fail,
    /// The test panicked before recording a status.
    Panic,
    /// The test returned early before recording a status.
    Error,
}

impl RunStatus {
    /// Returns the status label.
    const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Panic => "panic",
            Self::Error => "error",
        }
    }
}

/// Summary written last for every run.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    /// Suite binary name.
    test_name: &'a str,
    /// Final status.
    status: RunStatus,
    /// Wall time of the run.
    duration_ms: u128,
    /// Step tallies and flagged discrepancies.
    notes: Vec<String>,
    /// Files written next to the summary.
    artifacts: Vec<String>,
}

/// Milliseconds since the Unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Writes the report files of one suite run and its summary.
pub struct TestReporter {
    /// Run directory.
    root: PathBuf,
    /// Suite binary name.
    test_name: String,
    /// Start of the run.
    started_at_ms: u128,
    /// Whether a summary was written.
    finalized: bool,
}

impl TestReporter {
    /// Creates the run directory for `test_name`.
    ///
    /// Uses the configured run root, or `target/system-tests/run_<millis>`.
    pub fn new(test_name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let started_at_ms = now_millis();
        let base = config.run_root.unwrap_or_else(|| {
            PathBuf::from("target/system-tests").join(format!("run_{started_at_ms}"))
        });
        let root = base.join(test_name);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            test_name: test_name.to_string(),
            started_at_ms,
            finalized: false,
        })
    }

    /// Writes the suite report as canonical JSON and Markdown, plus the transcript.
    ///
    /// Returns the names of the written files.
    pub fn write_suite(
        &self,
        report: &SuiteReport,
        transcript: &[TranscriptEntry],
    ) -> io::Result<Vec<String>> {
        let [json, markdown, transcript_file] = SUITE_FILES;
        self.write_json(json, report)?;
        fs::write(self.root.join(markdown), report.to_markdown())?;
        self.write_json(transcript_file, &transcript)?;
        Ok(SUITE_FILES.iter().map(ToString::to_string).collect())
    }

    /// Writes the run summary as JSON and Markdown.
    pub fn finish(
        &mut self,
        status: RunStatus,
        notes: Vec<String>,
        artifacts: Vec<String>,
    ) -> io::Result<()> {
        let summary = RunSummary {
            test_name: &self.test_name,
            status,
            duration_ms: now_millis().saturating_sub(self.started_at_ms),
            notes,
            artifacts,
        };
        self.write_json("summary.json", &summary)?;
        fs::write(self.root.join("summary.md"), summary_markdown(&summary))?;
        self.finalized = true;
        Ok(())
    }

    /// Writes `value` as JCS-canonical JSON.
    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<()> {
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(self.root.join(name), bytes)
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { RunStatus::Panic } else { RunStatus::Error };
        let _ = self.finish(status, vec!["run ended without a summary".to_string()], Vec::new());
    }
}

/// Renders the summary as a short Markdown page.
fn summary_markdown(summary: &RunSummary<'_>) -> String {
    let mut out = format!("# {}\n\n", summary.test_name);
    out.push_str(&format!("- Status: {}\n", summary.status.as_str()));
    out.push_str(&format!("- Duration (ms): {}\n", summary.duration_ms));
    for (title, lines) in [("Notes", &summary.notes), ("Artifacts", &summary.artifacts)] {
        out.push_str(&format!("\n## {title}\n\n"));
        if lines.is_empty() {
            out.push_str("- None\n");
        }
        for line in lines {
            out.push_str(&format!("- {line}\n"));
        }
    }
    out
}
