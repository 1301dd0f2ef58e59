//! Progress spinners using indicatif

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{BatchObserver, ConversionJob, JobEvent, JobOutcome};

/// Symbol persisted next to a converted file
pub const SUCCESS_SYMBOL: &str = "✅";

/// Symbol persisted next to a failed file
pub const FAILURE_SYMBOL: &str = "❌";

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

/// Spinner line for a file in a given stage, e.g. `clip.mov (1/3): Encoding`
pub fn job_message(job: &ConversionJob, stage: &str) -> String {
    format!("{} {}: {}", job.file_name(), job.progress_label(), stage)
}

/// Shows one spinner per file, replaced as the batch advances.
///
/// Tool output only ticks the spinner; it never changes what is displayed.
/// In plain mode no spinner is drawn and one line per finished file goes to stdout.
pub struct SpinnerProgress {
    current: Option<ProgressBar>,
    plain: bool,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self {
            current: None,
            plain: false,
        }
    }

    /// Reporter for non-terminal output
    pub fn plain() -> Self {
        Self {
            current: None,
            plain: true,
        }
    }

    /// Spinners when stderr is a terminal, plain lines otherwise
    pub fn for_terminal() -> Self {
        if console::Term::stderr().is_term() {
            Self::new()
        } else {
            Self::plain()
        }
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchObserver for SpinnerProgress {
    fn job_started(&mut self, job: &ConversionJob) {
        if !self.plain {
            self.current = Some(create_spinner(&job_message(job, "Pending")));
        }
    }

    fn job_event(&mut self, job: &ConversionJob, event: JobEvent<'_>) {
        let Some(pb) = &self.current else {
            return;
        };
        match event {
            JobEvent::Stage(state) => pb.set_message(job_message(job, state.label())),
            JobEvent::Output(_) => pb.tick(),
        }
    }

    fn job_finished(&mut self, job: &ConversionJob, outcome: &JobOutcome) {
        let line = finished_line(job, outcome);
        match self.current.take() {
            Some(pb) => pb.finish_with_message(line),
            None => println!("{}", line),
        }
    }
}

/// Persisted line for a finished file, e.g. `✅ clip.mov (1/3)`
pub fn finished_line(job: &ConversionJob, outcome: &JobOutcome) -> String {
    match outcome {
        JobOutcome::Done => format!("{} {} {}", SUCCESS_SYMBOL, job.file_name(), job.progress_label()),
        JobOutcome::Failed(failure) => format!(
            "{} {} {}: {} failed",
            FAILURE_SYMBOL,
            job.file_name(),
            job.progress_label(),
            failure.step
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_job_message() {
        let job = ConversionJob::from_absolute(PathBuf::from("/v/clip.mov"), 0, 3);
        assert_eq!(job_message(&job, "Encoding"), "clip.mov (1/3): Encoding");
    }

    #[test]
    fn test_finished_line() {
        let job = ConversionJob::from_absolute(PathBuf::from("/v/clip.mov"), 1, 2);
        assert_eq!(finished_line(&job, &JobOutcome::Done), "✅ clip.mov (2/2)");
    }
}
