//! Diagnostic logging with tracing
//!
//! Logs go to stderr so they interleave with spinners but never with the
//! summary on stdout.

use tracing_subscriber::EnvFilter;

/// Map the number of `-v` flags to a filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::new(format!("webmify={}", level_for_verbosity(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
