//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mony - Track invoiced income
#[derive(Parser)]
#[command(name = "mony")]
#[command(about = "Import invoice exports into a local income database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "mony.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to ~/.local/share/mony/config/mony.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set MONY_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import an invoice export (semicolon-separated CSV)
    Import {
        #[command(subcommand)]
        action: ImportAction,
    },

    /// List stored incomes
    Incomes {
        /// Month name ("March", "mar") or "all"
        #[arg(short, long)]
        month: Option<String>,

        /// Four-digit year
        #[arg(short, long)]
        year: Option<i32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List stored clients
    Clients {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List distinct income categories
    Categories,

    /// Categorize task-list names
    Categorize {
        /// Task-list names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show the active configuration
    Config,
}

#[derive(Subcommand)]
pub enum ImportAction {
    /// Import income rows
    Incomes {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Derive and store clients from invoice descriptions
    Clients {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Import incomes, then clients
    All {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },
}
