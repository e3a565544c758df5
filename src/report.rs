use crate::test_result::TestResult;
use crate::test_runner::RunSummary;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Summary {
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
}

/// Machine readable copy of a run; diffs use colour-free markup
#[derive(Serialize)]
pub struct Report<'a> {
    pub summary: Summary,
    pub results: &'a IndexMap<String, TestResult>,
    pub differences: IndexMap<&'a str, String>,
}

impl<'a> Report<'a> {
    pub fn new(run_summary: &'a RunSummary) -> Report<'a> {
        Report {
            summary: Summary {
                total_tests: run_summary.total(),
                passed_tests: run_summary.passed(),
                failed_tests: run_summary.failed(),
            },
            results: &run_summary.results,
            differences: run_summary
                .differences
                .iter()
                .map(|(command, diff)| (command.as_str(), diff.plain()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to create JSON output: {0}")]
    FailedToSerialize(#[from] serde_json::Error),

    #[error("failed to write '{}': {source}", .path.display())]
    FailedToWriteFile { path: PathBuf, source: io::Error },
}

pub fn write_report(path: &Path, run_summary: &RunSummary) -> Result<(), ReportError> {
    let json = Report::new(run_summary).to_json()?;

    fs::write(path, json).map_err(|source| ReportError::FailedToWriteFile {
        path: path.to_owned(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "wrote report");

    Ok(())
}
