//! Batch summary report

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{ConversionJob, JobOutcome, Step, StepFailure};

/// Final status of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Done,
    Failed,
}

/// Result of one job as recorded in the batch report
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub source: PathBuf,
    pub target: PathBuf,
    pub status: JobStatus,
    /// Step that failed, if any
    pub failed_step: Option<Step>,
    pub message: Option<String>,
    pub elapsed: Duration,
}

impl JobRecord {
    pub fn new(job: &ConversionJob, outcome: &JobOutcome, elapsed: Duration) -> Self {
        let (status, failed_step, message) = match outcome {
            JobOutcome::Done => (JobStatus::Done, None, None),
            JobOutcome::Failed(failure) => (
                JobStatus::Failed,
                Some(failure.step),
                Some(failure_message(job, failure)),
            ),
        };
        Self {
            source: job.source_path.clone(),
            target: job.target_path.clone(),
            status,
            failed_step,
            message,
            elapsed,
        }
    }

    fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// A failed clean leaves the raw encode at the target path, so name it.
fn failure_message(job: &ConversionJob, failure: &StepFailure) -> String {
    match failure.step {
        Step::Encode => failure.to_string(),
        Step::Clean => format!(
            "{}; unclean encode left at '{}'",
            failure,
            job.target_path.display()
        ),
    }
}

/// Outcome of a whole batch
#[derive(Debug)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub records: Vec<JobRecord>,
    clock: Instant,
}

impl BatchReport {
    /// Start the batch clock.
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            records: Vec::new(),
            clock: Instant::now(),
        }
    }

    pub fn push(&mut self, record: JobRecord) {
        self.records.push(record);
    }

    /// Stop the batch clock.
    pub fn finish(&mut self) {
        self.elapsed = self.clock.elapsed();
    }

    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn succeeded(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == JobStatus::Done)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.succeeded()
    }

    /// The closing line, e.g. `Processed 2 file(s) in 0:01:05`.
    pub fn summary_line(&self) -> String {
        format!(
            "Processed {} file(s) in {}",
            self.processed(),
            format_elapsed(self.elapsed)
        )
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("BATCH SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
        ]);

        for record in &self.records {
            let status = match record.status {
                JobStatus::Done => Cell::new("✅ Done").fg(Color::Green),
                JobStatus::Failed => {
                    let step = record
                        .failed_step
                        .map(|s| format!(" ({})", s))
                        .unwrap_or_default();
                    Cell::new(format!("❌ Failed{}", step)).fg(Color::Red)
                }
            };
            table.add_row(vec![
                Cell::new(record.file_name()),
                status,
                Cell::new(format_elapsed(record.elapsed)),
            ]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if self.failed() > 0 {
            println!();
            println!(
                "    {} {} of {} file(s) failed",
                style("⚠").yellow().bold(),
                style(self.failed()).yellow().bold(),
                self.processed()
            );
            for record in self.records.iter().filter(|r| r.status == JobStatus::Failed) {
                if let Some(message) = &record.message {
                    println!(
                        "      {} {}: {}",
                        style("•").dim(),
                        record.file_name(),
                        style(message).dim()
                    );
                }
            }
        }

        println!();
        println!("{}", self.summary_line());
    }
}

/// Format a duration as `H:MM:SS`, hours unpadded.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
