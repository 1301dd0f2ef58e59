//! Webmify: Batch VP9/alpha WebM Conversion Library
//!
//! Resolves input files into conversion jobs, checks for existing outputs,
//! and drives the external encoder and container cleaner for each job.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
