//! flatprefs command line interface
//!
//! Inspects the flat key space of a persistent preference store.

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{dump, get, keys, remove};
use crate::error::Result;

/// Inspect a flatprefs store.
///
/// Every structured value lives under a dotted tag; these commands work on
/// the raw keys beneath it.
#[derive(Parser, Debug)]
#[command(name = "flatprefs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(short, long, env = "FLATPREFS_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    Table,
    /// JSON format
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the keys stored under a tag, with their kinds
    Keys {
        /// Root tag; lists every key when omitted
        tag: Option<String>,
    },

    /// Print the primitive stored at one key
    Get {
        /// The exact key
        key: String,
    },

    /// Print every key and value stored under a tag
    Dump {
        /// Root tag; dumps the whole store when omitted
        tag: Option<String>,
    },

    /// Remove a tag and everything stored beneath it
    Remove {
        /// Root tag to clear
        tag: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = cli.store.as_deref();

    match cli.command {
        Commands::Keys { tag } => keys::run(store, tag.as_deref(), cli.format),
        Commands::Get { key } => get::run(store, &key, cli.format),
        Commands::Dump { tag } => dump::run(store, tag.as_deref(), cli.format),
        Commands::Remove { tag } => remove::run(store, &tag),
    }
}
