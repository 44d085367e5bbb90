//! CLI module for scpstore
//!
//! Drives a configured backend from the command line:
//! - store / fetch: move files in and out
//! - exists / delete / clear: storage-side checks and removals
//! - url: public URL for an identifier

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run, open_backend, run_command, store, fetch, exists, delete, clear, url};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_error};
