//! Overwrite guard - pre-flight check for existing outputs
//!
//! Runs over every job before any encoding starts. A single declined
//! overwrite cancels the whole batch; nothing after it is checked.

use std::fs;
use std::io;

use tracing::{debug, info};

use super::error::PipelineError;
use super::job::ConversionJob;

/// Asks the operator whether an existing output may be replaced.
pub trait OverwritePrompt {
    /// Returns `true` only for an explicit "yes". `file_name` is the output's base name.
    fn confirm_overwrite(&mut self, file_name: &str) -> io::Result<bool>;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&str) -> io::Result<bool>,
{
    fn confirm_overwrite(&mut self, file_name: &str) -> io::Result<bool> {
        self(file_name)
    }
}

/// Result of checking one job's target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// No output exists yet
    Clear,
    /// An output existed and the operator had it removed
    Overwritten,
    /// An output exists and the operator kept it
    Declined,
}

/// Check one job's target path, prompting and deleting as needed.
pub fn check_target(
    job: &ConversionJob,
    prompt: &mut dyn OverwritePrompt,
) -> Result<GuardDecision, PipelineError> {
    if !target_exists(job) {
        return Ok(GuardDecision::Clear);
    }

    let file_name = job.target_name();
    let accepted = prompt
        .confirm_overwrite(&file_name)
        .map_err(|source| PipelineError::Prompt {
            file_name: file_name.clone(),
            source,
        })?;

    if !accepted {
        return Ok(GuardDecision::Declined);
    }

    fs::remove_file(&job.target_path).map_err(|source| PipelineError::RemoveExisting {
        path: job.target_path.clone(),
        source,
    })?;
    info!(path = %job.target_path.display(), "removed existing output");
    Ok(GuardDecision::Overwritten)
}

/// Check every job in order and return them all once each target is clear.
///
/// Stops at the first declined overwrite with [`PipelineError::Declined`].
pub fn authorize(
    jobs: Vec<ConversionJob>,
    prompt: &mut dyn OverwritePrompt,
) -> Result<Vec<ConversionJob>, PipelineError> {
    for job in &jobs {
        if check_target(job, prompt)? == GuardDecision::Declined {
            return Err(PipelineError::Declined {
                file_name: job.target_name(),
            });
        }
    }
    Ok(jobs)
}

// Any metadata error other than "not found" is treated as "not found".
fn target_exists(job: &ConversionJob) -> bool {
    match fs::metadata(&job.target_path) {
        Ok(_) => true,
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) => {
            debug!(
                path = %job.target_path.display(),
                error = %err,
                "existence check failed, treating target as absent"
            );
            false
        }
    }
}
