//! Error types for the conversion pipeline.
//!
//! `PipelineError` covers everything that stops the whole batch. Failures of a
//! single file's encode or clean step are not errors here: they are carried as
//! a [`StepFailure`] value inside the job outcome so the batch keeps going.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that abort the whole batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No file arguments were supplied.
    #[error("no input files given")]
    NoInputFiles,

    /// An input argument could not be made absolute.
    #[error("failed to resolve input path '{}'", .input.display())]
    Resolve {
        input: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The operator answered "no" when asked to overwrite an existing output.
    #[error("overwrite of '{file_name}' declined")]
    Declined { file_name: String },

    /// The overwrite prompt itself failed (closed terminal, read error).
    #[error("failed to ask about overwriting '{file_name}'")]
    Prompt {
        file_name: String,
        #[source]
        source: io::Error,
    },

    /// The operator accepted an overwrite but the old output could not be removed.
    #[error("failed to remove existing output '{}'", .path.display())]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Installing the cleaned file under the target name failed.
    #[error("failed to {action} '{}'", .path.display())]
    Swap {
        action: SwapAction,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Which half of the delete-then-rename swap failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAction {
    RemoveEncoded,
    RenameCleaned,
}

impl fmt::Display for SwapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapAction::RemoveEncoded => write!(f, "remove encoded file"),
            SwapAction::RenameCleaned => write!(f, "install cleaned file over"),
        }
    }
}

/// Pipeline step that runs an external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Encode,
    Clean,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Encode => write!(f, "encode"),
            Step::Clean => write!(f, "clean"),
        }
    }
}

/// Why an external tool step failed.
#[derive(Debug)]
pub enum FailureReason {
    /// The tool could not be started at all.
    Spawn(io::Error),
    /// The tool ran and exited unsuccessfully. `tail` holds its last stderr lines.
    Exit { status: ExitStatus, tail: Vec<String> },
}

/// A file-local failure of the encode or clean step.
#[derive(Debug)]
pub struct StepFailure {
    pub step: Step,
    pub program: String,
    pub reason: FailureReason,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FailureReason::Spawn(err) => {
                write!(f, "{} failed: could not start '{}': {}", self.step, self.program, err)
            }
            FailureReason::Exit { status, tail } => {
                write!(f, "{} failed: '{}' exited with {}", self.step, self.program, status)?;
                if let Some(last) = tail.last() {
                    write!(f, " ({})", last)?;
                }
                Ok(())
            }
        }
    }
}
