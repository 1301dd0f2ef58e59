//! Integration tests for the conversion pipeline using stand-in tools

#![cfg(unix)]

use std::fs;

use webmify::pipeline::*;
use webmify::report::JobStatus;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn toolchain() -> Toolchain {
    let tools = fake_tools();
    Toolchain::new(&tools.encoder, &tools.cleaner)
}

#[derive(Default)]
struct RecordingObserver {
    events: Vec<(String, String)>,
}

impl BatchObserver for RecordingObserver {
    fn job_started(&mut self, job: &ConversionJob) {
        self.events.push((job.file_name(), "started".to_string()));
    }

    fn job_event(&mut self, job: &ConversionJob, event: JobEvent<'_>) {
        let label = match event {
            JobEvent::Stage(state) => state.label().to_string(),
            JobEvent::Output(line) => format!("output:{}", line),
        };
        self.events.push((job.file_name(), label));
    }

    fn job_finished(&mut self, job: &ConversionJob, outcome: &JobOutcome) {
        let label = if outcome.is_done() { "finished:done" } else { "finished:failed" };
        self.events.push((job.file_name(), label.to_string()));
    }
}

#[test]
fn test_batch_converts_every_file() {
    let (dir, inputs) = create_inputs(&["a.mov", "b.mov"]);
    let jobs = resolve_jobs(&inputs).unwrap();

    let report = run_batch(&jobs, &toolchain(), &mut NoProgress).unwrap();

    assert_eq!(report.processed(), 2);
    assert_eq!(report.failed(), 0);
    for input in &inputs {
        let target = webm_path(input);
        assert_eq!(fs::read_to_string(&target).unwrap(), "cleaned+encoded");
        assert!(!clean_path(input).exists(), "temp file should be renamed away");
    }
    assert_eq!(
        tool_calls(dir.path()),
        vec![
            format!("encode {}", inputs[0].display()),
            format!("clean {}", webm_path(&inputs[0]).display()),
            format!("encode {}", inputs[1].display()),
            format!("clean {}", webm_path(&inputs[1]).display()),
        ]
    );
}

#[test]
fn test_encoder_failure_does_not_stop_batch() {
    let (dir, inputs) = create_inputs(&["a-FAIL.mov", "b.mov"]);
    let jobs = resolve_jobs(&inputs).unwrap();

    let report = run_batch(&jobs, &toolchain(), &mut NoProgress).unwrap();

    assert_eq!(report.records[0].status, JobStatus::Failed);
    assert_eq!(report.records[0].failed_step, Some(Step::Encode));
    assert!(report.records[0]
        .message
        .as_deref()
        .unwrap()
        .contains("encoder exploded"));
    assert_eq!(report.records[1].status, JobStatus::Done);
    assert!(webm_path(&inputs[1]).exists());

    // The failed file never reached the cleaner
    let calls = tool_calls(dir.path());
    assert_eq!(calls.len(), 3);
    assert!(calls[1].starts_with("encode "));
}

#[test]
fn test_cleaner_failure_does_not_stop_batch() {
    let (dir, inputs) = create_inputs(&["a-BADCLEAN.mov", "b.mov"]);
    let jobs = resolve_jobs(&inputs).unwrap();

    let report = run_batch(&jobs, &toolchain(), &mut NoProgress).unwrap();

    let record = &report.records[0];
    assert_eq!(record.status, JobStatus::Failed);
    assert_eq!(record.failed_step, Some(Step::Clean));
    let message = record.message.as_deref().unwrap();
    assert!(message.contains("cleaner exploded"), "{}", message);
    assert!(message.contains("unclean encode left at"), "{}", message);
    // The raw encode stays behind under the target name
    assert_eq!(fs::read_to_string(webm_path(&inputs[0])).unwrap(), "encoded");

    assert_eq!(report.records[1].status, JobStatus::Done);
    assert_eq!(fs::read_to_string(webm_path(&inputs[1])).unwrap(), "cleaned+encoded");
    assert!(!clean_path(&inputs[1]).exists());
    assert_eq!(
        tool_calls(dir.path()),
        vec![
            format!("encode {}", inputs[0].display()),
            format!("clean {}", webm_path(&inputs[0]).display()),
            format!("encode {}", inputs[1].display()),
            format!("clean {}", webm_path(&inputs[1]).display()),
        ]
    );
}

#[test]
fn test_cleaner_failure_on_every_file_keeps_going() {
    let (_dir, inputs) = create_inputs(&["a.mov", "b.mov"]);
    let jobs = resolve_jobs(&inputs).unwrap();
    let tools = fake_tools();
    let failing = Toolchain::new(&tools.encoder, &tools.failing_cleaner);

    let report = run_batch(&jobs, &failing, &mut NoProgress).unwrap();

    assert_eq!(report.processed(), 2);
    assert_eq!(report.failed(), 2);
    assert!(report
        .records
        .iter()
        .all(|r| r.failed_step == Some(Step::Clean)));
}

#[test]
fn test_missing_cleaned_file_is_fatal() {
    let (dir, inputs) = create_inputs(&["a.mov", "b.mov"]);
    let jobs = resolve_jobs(&inputs).unwrap();
    let tools = fake_tools();
    let toolchain = Toolchain::new(&tools.encoder, &tools.silent_cleaner);

    let err = run_batch(&jobs, &toolchain, &mut NoProgress).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Swap {
            action: SwapAction::RenameCleaned,
            ..
        }
    ));
    // b.mov was never started
    assert_eq!(tool_calls(dir.path()).len(), 2);
    assert!(!webm_path(&inputs[1]).exists());
}

#[test]
fn test_observer_sees_stages_in_order() {
    let (_dir, inputs) = create_inputs(&["clip.mov"]);
    let jobs = resolve_jobs(&inputs).unwrap();
    let mut observer = RecordingObserver::default();

    run_batch(&jobs, &toolchain(), &mut observer).unwrap();

    let labels: Vec<&str> = observer
        .events
        .iter()
        .map(|(_, label)| label.as_str())
        .filter(|label| !label.starts_with("output:"))
        .collect();
    assert_eq!(
        labels,
        vec!["started", "Encoding", "Cleaning", "Renaming", "Done", "finished:done"]
    );
    assert!(observer
        .events
        .iter()
        .any(|(_, label)| label == "output:frame=2"));
}

#[test]
fn test_paths_with_spaces() {
    let (_dir, inputs) = create_inputs(&["my clip.mov"]);
    let jobs = resolve_jobs(&inputs).unwrap();

    let report = run_batch(&jobs, &toolchain(), &mut NoProgress).unwrap();

    assert_eq!(report.succeeded(), 1);
    assert!(webm_path(&inputs[0]).exists());
    assert!(!clean_path(&inputs[0]).exists());
}

#[test]
fn test_guard_then_batch_overwrites_accepted_target() {
    let (_dir, inputs) = create_inputs(&["a.mov"]);
    fs::write(webm_path(&inputs[0]), "stale").unwrap();
    let jobs = resolve_jobs(&inputs).unwrap();

    let mut prompt = |_: &str| -> std::io::Result<bool> { Ok(true) };
    let jobs = authorize(jobs, &mut prompt).unwrap();
    assert!(!webm_path(&inputs[0]).exists(), "accepted target is removed before encoding");

    run_batch(&jobs, &toolchain(), &mut NoProgress).unwrap();
    assert_eq!(fs::read_to_string(webm_path(&inputs[0])).unwrap(), "cleaned+encoded");
}
