//! JSON export of batch results

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::summary::{format_elapsed, BatchReport, JobRecord, JobStatus};
use crate::pipeline::Step;

/// One file's entry in the exported report
#[derive(Serialize)]
pub struct JobExportEntry {
    pub source: String,
    pub target: String,
    /// "done" or "failed"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub elapsed_secs: f64,
}

/// Complete batch export
#[derive(Serialize)]
pub struct BatchExport {
    /// Batch start (ISO 8601 format)
    pub started_at: String,
    pub webmify_version: String,
    pub elapsed: String,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<JobExportEntry>,
}

impl From<&JobRecord> for JobExportEntry {
    fn from(record: &JobRecord) -> Self {
        Self {
            source: record.source.display().to_string(),
            target: record.target.display().to_string(),
            status: match record.status {
                JobStatus::Done => "done",
                JobStatus::Failed => "failed",
            },
            failed_step: record.failed_step,
            message: record.message.clone(),
            elapsed_secs: record.elapsed.as_secs_f64(),
        }
    }
}

impl From<&BatchReport> for BatchExport {
    fn from(report: &BatchReport) -> Self {
        Self {
            started_at: report.started_at.to_rfc3339(),
            webmify_version: env!("CARGO_PKG_VERSION").to_string(),
            elapsed: format_elapsed(report.elapsed),
            processed: report.processed(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            files: report.records.iter().map(JobExportEntry::from).collect(),
        }
    }
}

/// Write the batch report as pretty-printed JSON.
pub fn export_batch_report(report: &BatchReport, output_path: &Path) -> Result<()> {
    let export = BatchExport::from(report);
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize batch report")?;
    std::fs::write(output_path, json).with_context(|| {
        format!("Failed to write batch report: {}", output_path.display())
    })?;
    Ok(())
}
