#![forbid(unsafe_code)]

//! Front end for the toz breakdown calculator: one-shot `forward`/`inverse`
//! commands, an interactive line session, and configuration inspection.

pub mod cli;
pub mod error;
pub mod format;
pub mod logging;
pub mod repl;
pub mod report;

pub use cli::{Cli, run};
pub use error::{CliError, Result};
