//! Input resolution - turns command-line arguments into conversion jobs
//!
//! All derived paths are pure path arithmetic on the absolute input path:
//! - target: `<input>.webm`
//! - temp:   `<dir>/clean.<input file name>.webm` (where the cleaner writes)

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::error::PipelineError;

/// Suffix appended to every input to form its output path
pub const TARGET_SUFFIX: &str = ".webm";

/// Prefix the cleaner puts in front of the file it rewrites
pub const CLEAN_PREFIX: &str = "clean.";

/// One input file's unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub temp_path: PathBuf,
    /// Zero-based position within the batch
    pub index: usize,
    pub total: usize,
}

impl ConversionJob {
    /// Resolve one argument against the current directory and derive its paths.
    pub fn resolve(input: &Path, index: usize, total: usize) -> Result<Self, PipelineError> {
        let source_path = std::path::absolute(input).map_err(|source| PipelineError::Resolve {
            input: input.to_path_buf(),
            source,
        })?;
        Ok(Self::from_absolute(source_path, index, total))
    }

    /// Derive target and temp paths from an already absolute source path.
    pub fn from_absolute(source_path: PathBuf, index: usize, total: usize) -> Self {
        let mut target = source_path.clone().into_os_string();
        target.push(TARGET_SUFFIX);

        let mut temp_name = OsString::from(CLEAN_PREFIX);
        temp_name.push(source_path.file_name().unwrap_or_default());
        temp_name.push(TARGET_SUFFIX);
        let temp_path = source_path
            .parent()
            .unwrap_or_else(|| Path::new("/"))
            .join(temp_name);

        Self {
            source_path,
            target_path: PathBuf::from(target),
            temp_path,
            index,
            total,
        }
    }

    /// Base name of the input file, used as the spinner label.
    pub fn file_name(&self) -> String {
        display_name(&self.source_path)
    }

    /// Base name of the output file, used in the overwrite prompt.
    pub fn target_name(&self) -> String {
        display_name(&self.target_path)
    }

    /// Directory holding the input, the target and the temp file.
    pub fn target_dir(&self) -> &Path {
        self.target_path.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// Position label like `(2/5)`.
    pub fn progress_label(&self) -> String {
        format!("({}/{})", self.index + 1, self.total)
    }
}

/// Resolve every argument into a job, keeping argument order.
pub fn resolve_jobs(inputs: &[PathBuf]) -> Result<Vec<ConversionJob>, PipelineError> {
    if inputs.is_empty() {
        return Err(PipelineError::NoInputFiles);
    }
    let total = inputs.len();
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| ConversionJob::resolve(input, index, total))
        .collect()
}

/// Quoting convention used when rendering a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// Escape a file argument for display in a shell-style command line.
///
/// Windows wraps the whole argument in double quotes; POSIX escapes each
/// space with a backslash.
pub fn escape_file_arg(arg: &str, platform: Platform) -> String {
    match platform {
        Platform::Windows => format!("\"{}\"", arg),
        Platform::Posix => arg.replace(' ', "\\ "),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
