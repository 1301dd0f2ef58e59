//! External tool invocation (encoder and container cleaner)
//!
//! Both tools are opaque: the contract is argv in, exit status out. Stderr is
//! streamed back line by line so the caller can animate a spinner, and the
//! last few lines are kept to explain a failure.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::error::{FailureReason, Step, StepFailure};
use super::job::{escape_file_arg, ConversionJob, Platform};

/// Default encoder executable, looked up on `PATH`
pub const DEFAULT_ENCODER: &str = "ffmpeg";

/// Default cleaner executable, looked up on `PATH`
pub const DEFAULT_CLEANER: &str = "mkclean";

/// Number of stderr lines kept for failure messages
const TAIL_LINES: usize = 8;

/// Executables used for the encode and clean steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub encoder: PathBuf,
    pub cleaner: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            encoder: PathBuf::from(DEFAULT_ENCODER),
            cleaner: PathBuf::from(DEFAULT_CLEANER),
        }
    }
}

impl Toolchain {
    pub fn new(encoder: impl Into<PathBuf>, cleaner: impl Into<PathBuf>) -> Self {
        Self {
            encoder: encoder.into(),
            cleaner: cleaner.into(),
        }
    }

    /// VP9 encode with alpha, reading the source and writing the target.
    pub fn encode(&self, job: &ConversionJob) -> ToolInvocation {
        ToolInvocation {
            step: Step::Encode,
            program: self.encoder.clone(),
            args: encoder_args(job),
            working_dir: None,
        }
    }

    /// Container clean of the target; the cleaner writes `clean.<name>` next to it.
    pub fn clean(&self, job: &ConversionJob) -> ToolInvocation {
        ToolInvocation {
            step: Step::Clean,
            program: self.cleaner.clone(),
            args: cleaner_args(job),
            working_dir: Some(job.target_dir().to_path_buf()),
        }
    }
}

/// Encoder arguments: libvpx-vp9 at 25 Mb/s, yuva420p, alpha_mode tag, no alt-ref frames.
pub fn encoder_args(job: &ConversionJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), job.source_path.clone().into()];
    args.extend(
        [
            "-c:v",
            "libvpx-vp9",
            "-b:v",
            "25M",
            "-pix_fmt",
            "yuva420p",
            "-metadata:s:v:0",
            "alpha_mode=1",
            "-auto-alt-ref",
            "0",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(job.target_path.clone().into());
    args
}

/// Cleaner arguments: WebM doctype 4, keep cues, optimize.
pub fn cleaner_args(job: &ConversionJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["--doctype", "4", "--keep-cues", "--optimize"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(job.target_path.clone().into());
    args
}

/// One ready-to-run external tool call
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub step: Step,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
}

impl ToolInvocation {
    /// Render as a shell-style command line, escaping arguments that are paths.
    pub fn command_line(&self, platform: Platform) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(|a| a.as_os_str()))
            .map(|arg| {
                let arg = arg.to_string_lossy();
                if Path::new(&*arg).is_absolute() {
                    escape_file_arg(&arg, platform)
                } else {
                    arg.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the tool to completion, handing each stderr line to `on_output`.
    ///
    /// Blocks until the process exits; there is no timeout.
    pub fn run(&self, on_output: &mut dyn FnMut(&str)) -> Result<(), StepFailure> {
        debug!(step = %self.step, command = %self.command_line(Platform::current()), "running tool");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|err| self.failure(FailureReason::Spawn(err)))?;

        let mut tail = VecDeque::with_capacity(TAIL_LINES);
        if let Some(stderr) = child.stderr.take() {
            let mut reader = BufReader::new(stderr);
            let mut buf = Vec::new();
            // ffmpeg rewrites its status line with '\r', so split on both terminators
            loop {
                buf.clear();
                match read_fragment(&mut reader, &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(err) => {
                        debug!(step = %self.step, error = %err, "stopped reading tool output");
                        break;
                    }
                }
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                trace!(step = %self.step, "{}", line);
                on_output(line);
                if tail.len() == TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line.to_string());
            }
        }

        let status = child.wait().map_err(|err| self.failure(FailureReason::Spawn(err)))?;
        if status.success() {
            Ok(())
        } else {
            Err(self.failure(FailureReason::Exit {
                status,
                tail: tail.into_iter().collect(),
            }))
        }
    }

    fn failure(&self, reason: FailureReason) -> StepFailure {
        StepFailure {
            step: self.step,
            program: self.program.display().to_string(),
            reason,
        }
    }
}

/// Read up to and including the next '\n' or '\r'. Returns bytes consumed.
fn read_fragment<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<usize> {
    let mut consumed = 0;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(consumed);
        }
        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(pos) => {
                buf.extend_from_slice(&available[..=pos]);
                reader.consume(pos + 1);
                return Ok(consumed + pos + 1);
            }
            None => {
                let len = available.len();
                buf.extend_from_slice(available);
                reader.consume(len);
                consumed += len;
            }
        }
    }
}
