//! CLI command implementations
//!
//! Each command drives one backend operation and reports the outcome as a
//! single JSON response.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde_json::json;
use tracing::{info, warn};

use crate::file_storage::{ScpBackend, ScpConfig, StorageBackend};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Entry point: parse args, build the backend, run the command
///
/// Setup failures are reported the same way as command failures.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = open_backend(&cli.config)
        .and_then(|backend| run_command(&backend, cli.command, &mut out));
    if let Err(e) = &result {
        report_error(&mut out, e);
    }
    result
}

/// Load the configuration and build the backend it describes
pub fn open_backend(config: &Path) -> CliResult<ScpBackend> {
    let backend = ScpBackend::new(ScpConfig::load(config)?)?;
    info!(config = %config.display(), "backend ready");
    Ok(backend)
}

fn report_error(out: &mut dyn Write, e: &CliError) {
    if let Err(write_err) = write_error(out, e.code().code(), e.message()) {
        warn!(error = %write_err, "could not write error response");
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(
    backend: &dyn StorageBackend,
    cmd: Command,
    out: &mut dyn Write,
) -> CliResult<()> {
    match cmd {
        Command::Store { id, input } => store(backend, &id, input.as_deref(), out),
        Command::Fetch { id, output } => fetch(backend, &id, &output, out),
        Command::Exists { id } => exists(backend, &id, out),
        Command::Delete { id } => delete(backend, &id, out),
        Command::Clear => clear(backend, out),
        Command::Url { id } => url(backend, &id, out),
    }
}

/// Upload `input` (or stdin) under `id`
pub fn store(
    backend: &dyn StorageBackend,
    id: &str,
    input: Option<&Path>,
    out: &mut dyn Write,
) -> CliResult<()> {
    match input {
        Some(path) => {
            let mut file = File::open(path)?;
            backend.store(&mut file, id)?;
        }
        None => {
            let stdin = io::stdin();
            let mut lock = stdin.lock();
            backend.store(&mut lock, id)?;
        }
    }

    write_response(out, json!({ "id": id, "url": backend.url(id) }))
}

/// Download `id` into `output`
pub fn fetch(
    backend: &dyn StorageBackend,
    id: &str,
    output: &Path,
    out: &mut dyn Write,
) -> CliResult<()> {
    let staged = backend.open(id)?;
    staged.persist(output)?;

    write_response(out, json!({ "id": id, "output": output.display().to_string() }))
}

pub fn exists(backend: &dyn StorageBackend, id: &str, out: &mut dyn Write) -> CliResult<()> {
    write_response(out, json!({ "id": id, "exists": backend.exists(id) }))
}

pub fn delete(backend: &dyn StorageBackend, id: &str, out: &mut dyn Write) -> CliResult<()> {
    backend.delete(id);
    write_response(out, json!({ "id": id }))
}

pub fn clear(backend: &dyn StorageBackend, out: &mut dyn Write) -> CliResult<()> {
    backend.delete_all();
    write_response(out, json!({}))
}

pub fn url(backend: &dyn StorageBackend, id: &str, out: &mut dyn Write) -> CliResult<()> {
    write_response(out, json!({ "id": id, "url": backend.url(id) }))
}
