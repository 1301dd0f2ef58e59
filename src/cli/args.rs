//! Command-line argument definitions using clap

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::pipeline::{Toolchain, DEFAULT_CLEANER, DEFAULT_ENCODER};

/// Webmify - Convert videos to VP9 WebM with alpha channel, then clean the container
#[derive(Parser, Debug)]
#[command(name = "webmify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input files. Each FILE is written to FILE.webm next to it.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Encoder executable
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ENCODER)]
    pub ffmpeg: PathBuf,

    /// Container cleaner executable
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CLEANER)]
    pub mkclean: PathBuf,

    /// Write a JSON report of the batch to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// External tools selected on the command line.
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new(self.ffmpeg.clone(), self.mkclean.clone())
    }
}
