//! Dynamic JSON CLI Library
//!
//! Argument parsing and command execution for the `dynjson` tool, a thin host
//! over the `dynamic_value` bridge.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod session;

pub use cli::{Cli, Command};
pub use error::{CliError, CliResult};
pub use session::{lookup, read_input, Outcome, Session};
