//! The batch command: resolve inputs, clear overwrites, then convert
//!
//! Phase 1 (overwrite guard) finishes for every file before phase 2 starts.
//! A decline in phase 1 cancels everything; a failed file in phase 2 does not.

use anyhow::{Context, Result};

use super::args::Cli;
use crate::pipeline::{authorize, resolve_jobs, run_batch, BatchObserver, OverwritePrompt, PipelineError};
use crate::report::export_batch_report;
use crate::utils::{print_aborted, print_header, print_usage};

/// How a batch run ended, short of a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every job ran; `failed` of them did not produce output
    Completed { processed: usize, failed: usize },
    /// No file arguments
    NoInput,
    /// The operator kept an existing output
    Declined { file_name: String },
}

impl RunStatus {
    /// Process exit code. Per-file failures still exit 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Completed { .. } => 0,
            RunStatus::NoInput | RunStatus::Declined { .. } => 1,
        }
    }
}

/// Run the whole batch described by `cli`.
///
/// Errors returned here are fatal (a failed swap, an unreadable prompt).
pub fn run(
    cli: &Cli,
    prompt: &mut dyn OverwritePrompt,
    observer: &mut dyn BatchObserver,
) -> Result<RunStatus> {
    let jobs = match resolve_jobs(&cli.files) {
        Ok(jobs) => jobs,
        Err(PipelineError::NoInputFiles) => {
            print_usage("webmify");
            return Ok(RunStatus::NoInput);
        }
        Err(err) => return Err(err.into()),
    };

    let jobs = match authorize(jobs, prompt) {
        Ok(jobs) => jobs,
        Err(PipelineError::Declined { file_name }) => {
            print_aborted(&format!(
                "Kept existing \"{}\"; no files were converted.",
                file_name
            ));
            return Ok(RunStatus::Declined { file_name });
        }
        Err(err) => return Err(err).context("Overwrite check failed"),
    };

    println!();
    print_header(env!("CARGO_PKG_VERSION"), jobs.len());

    let report = run_batch(&jobs, &cli.toolchain(), observer).context("Batch stopped")?;
    report.display();

    if let Some(path) = &cli.report {
        export_batch_report(&report, path)?;
    }

    Ok(RunStatus::Completed {
        processed: report.processed(),
        failed: report.failed(),
    })
}
