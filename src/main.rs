//! Webmify: Batch VP9/alpha WebM Conversion CLI
//!
//! Encodes each input with ffmpeg, cleans the container with mkclean and
//! swaps the cleaned file into place, one file at a time.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use webmify::cli::{self, Cli, TerminalPrompt};
use webmify::utils::{init_logging, SpinnerProgress};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut prompt = TerminalPrompt::stdin();
    let mut progress = SpinnerProgress::for_terminal();
    let status = cli::run(&cli, &mut prompt, &mut progress)?;

    Ok(ExitCode::from(status.exit_code()))
}
