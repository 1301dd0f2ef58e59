//! Pipeline module - resolves inputs, guards outputs and runs conversions

pub mod convert;
pub mod error;
pub mod guard;
pub mod job;
pub mod tools;

pub use convert::*;
pub use error::*;
pub use guard::*;
pub use job::*;
pub use tools::*;
