//! Command-line interface
//!
//! One JSON object per response on stdout; logs on stderr.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run, Request, Session};
pub use errors::{CliError, CliResult};
