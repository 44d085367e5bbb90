//! scpstore CLI entry point
//!
//! Sets up logging, then delegates to the CLI module. Errors go to stderr
//! with a non-zero exit.

use scpstore::{cli, logging};

fn main() {
    logging::init();

    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
