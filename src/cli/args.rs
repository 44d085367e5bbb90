//! CLI argument definitions using clap
//!
//! Commands:
//! - scpstore store <id> [--input <file>]
//! - scpstore fetch <id> --output <file>
//! - scpstore exists <id>
//! - scpstore delete <id>
//! - scpstore clear
//! - scpstore url <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// scpstore - file storage over scp
#[derive(Parser, Debug)]
#[command(name = "scpstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./scpstore.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a file (or stdin) under an identifier
    Store {
        id: String,

        /// File to upload; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Download a stored file
    Fetch {
        id: String,

        /// Where to write the file
        #[arg(long)]
        output: PathBuf,
    },

    /// Print whether an identifier is stored
    Exists { id: String },

    /// Remove a stored file
    Delete { id: String },

    /// Remove every stored file under the configured prefix
    Clear,

    /// Print the public URL for an identifier
    Url { id: String },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
