//! Developer tooling for framehistory.
//!
//! This crate provides the `framehistory` command-line interface.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::Cli;
pub use error::{CliError, CliResult};
