//! ghg CLI library.
//!
//! Configuration loading, argument definitions, command execution and
//! output formatting for the `ghg` binary. Commands expose their
//! computation separately from printing so they can be driven from tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
