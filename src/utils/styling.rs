//! Terminal styling helpers

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static FILM: Emoji<'_, '_> = Emoji("🎞️  ", ">> ");
pub static STOP: Emoji<'_, '_> = Emoji("🛑 ", "!! ");

/// Print the batch header line
pub fn print_header(version: &str, file_count: usize) {
    println!(
        "{}{} {} {}",
        FILM,
        style("webmify").cyan().bold(),
        style(format!("v{}", version)).dim(),
        style(format!("· {} file(s) → VP9 WebM with alpha", file_count)).dim()
    );
}

/// Print the message shown when the operator cancels the batch
pub fn print_aborted(reason: &str) {
    println!("{}{}", STOP, style("Aborting").red().bold());
    println!("   {}", style(reason).dim());
}

/// Print usage when no files were given
pub fn print_usage(bin: &str) {
    eprintln!(
        "{} {} <file1> [file2 ...]",
        style("Usage:").bold(),
        bin
    );
}
