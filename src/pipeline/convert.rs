//! Conversion pipeline - encode, clean and swap, one job at a time
//!
//! Each job walks a linear state machine:
//!
//! ```text
//! Pending -> Encoding -> Cleaning -> Swapping -> Done
//!               |           |
//!               +-----------+----> Failed
//! ```
//!
//! Encoder and cleaner failures end the job as `Failed` and the batch moves on.
//! A failing swap is returned as an error and ends the batch.

use std::fs;
use std::time::Instant;

use tracing::{info, warn};

use super::error::{PipelineError, StepFailure, SwapAction};
use super::job::ConversionJob;
use super::tools::{ToolInvocation, Toolchain};
use crate::report::{BatchReport, JobRecord};

/// Where a job is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Encoding,
    Cleaning,
    Swapping,
    Done,
    Failed,
}

impl JobState {
    /// Label shown next to the spinner while the state is active
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Pending => "Pending",
            JobState::Encoding => "Encoding",
            JobState::Cleaning => "Cleaning",
            JobState::Swapping => "Renaming",
            JobState::Done => "Done",
            JobState::Failed => "Failed",
        }
    }
}

/// Progress notifications emitted while a job runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent<'a> {
    /// The job entered a new state
    Stage(JobState),
    /// The running tool printed a line of diagnostics
    Output(&'a str),
}

/// How a job ended
#[derive(Debug)]
pub enum JobOutcome {
    Done,
    Failed(StepFailure),
}

impl JobOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, JobOutcome::Done)
    }
}

/// Receives batch progress; the terminal spinner is one implementation.
pub trait BatchObserver {
    fn job_started(&mut self, job: &ConversionJob);
    fn job_event(&mut self, job: &ConversionJob, event: JobEvent<'_>);
    fn job_finished(&mut self, job: &ConversionJob, outcome: &JobOutcome);
}

/// Observer that ignores everything.
pub struct NoProgress;

impl BatchObserver for NoProgress {
    fn job_started(&mut self, _job: &ConversionJob) {}
    fn job_event(&mut self, _job: &ConversionJob, _event: JobEvent<'_>) {}
    fn job_finished(&mut self, _job: &ConversionJob, _outcome: &JobOutcome) {}
}

/// Run one job through encode, clean and swap.
///
/// Tool failures come back as `Ok(JobOutcome::Failed)`; only a failed swap is an `Err`.
pub fn run_job(
    job: &ConversionJob,
    toolchain: &Toolchain,
    on_event: &mut dyn FnMut(JobEvent<'_>),
) -> Result<JobOutcome, PipelineError> {
    let mut state = JobState::Pending;
    let mut failure = None;

    while !matches!(state, JobState::Done | JobState::Failed) {
        state = match state {
            JobState::Pending => JobState::Encoding,
            JobState::Encoding => {
                advance(toolchain.encode(job), JobState::Cleaning, &mut failure, on_event)
            }
            JobState::Cleaning => {
                advance(toolchain.clean(job), JobState::Swapping, &mut failure, on_event)
            }
            JobState::Swapping => {
                swap(job)?;
                JobState::Done
            }
            JobState::Done | JobState::Failed => state,
        };
        on_event(JobEvent::Stage(state));
    }

    Ok(match failure {
        Some(failure) => JobOutcome::Failed(failure),
        None => JobOutcome::Done,
    })
}

fn advance(
    invocation: ToolInvocation,
    next: JobState,
    failure: &mut Option<StepFailure>,
    on_event: &mut dyn FnMut(JobEvent<'_>),
) -> JobState {
    let result = invocation.run(&mut |line| on_event(JobEvent::Output(line)));
    match result {
        Ok(()) => next,
        Err(err) => {
            *failure = Some(err);
            JobState::Failed
        }
    }
}

/// Remove the raw encode and move the cleaned file into its place.
///
/// The cleaned file already exists under its temp name before the target is removed.
pub fn swap(job: &ConversionJob) -> Result<(), PipelineError> {
    fs::remove_file(&job.target_path).map_err(|source| PipelineError::Swap {
        action: SwapAction::RemoveEncoded,
        path: job.target_path.clone(),
        source,
    })?;
    fs::rename(&job.temp_path, &job.target_path).map_err(|source| PipelineError::Swap {
        action: SwapAction::RenameCleaned,
        path: job.target_path.clone(),
        source,
    })?;
    Ok(())
}

/// Run every job in order, recording outcomes and timings.
///
/// A failed job does not stop the batch; a swap error does and is returned as-is.
pub fn run_batch(
    jobs: &[ConversionJob],
    toolchain: &Toolchain,
    observer: &mut dyn BatchObserver,
) -> Result<BatchReport, PipelineError> {
    let mut report = BatchReport::start();

    for job in jobs {
        let job_start = Instant::now();
        observer.job_started(job);

        let outcome = run_job(job, toolchain, &mut |event| observer.job_event(job, event))?;

        // Log only once the spinner line is finished so the two do not interleave
        observer.job_finished(job, &outcome);
        match &outcome {
            JobOutcome::Done => info!(file = %job.source_path.display(), "converted"),
            JobOutcome::Failed(failure) => {
                warn!(file = %job.source_path.display(), "{}", failure)
            }
        }
        report.push(JobRecord::new(job, &outcome, job_start.elapsed()));
    }

    report.finish();
    Ok(report)
}
