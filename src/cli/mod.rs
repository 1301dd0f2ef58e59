//! CLI module - argument parsing, interactive prompts and the batch command

mod args;
pub mod batch;
mod prompts;

pub use args::Cli;
pub use batch::*;
pub use prompts::*;
