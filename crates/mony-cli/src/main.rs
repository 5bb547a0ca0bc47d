//! Mony CLI - Invoice income tracker
//!
//! Usage:
//!   mony init                          Initialize database
//!   mony import all --file CSV         Import incomes and clients from an invoice export
//!   mony incomes --month march         List incomes for a month
//!   mony categorize "Weekly catchup"   Categorize task-list names

mod cli;
mod commands;


use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use mony_core::MonyConfig;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = MonyConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    init_logging(&cli, &config)?;
    debug!("Configuration loaded from {}", config.source);

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Import { action } => {
            let mut db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                ImportAction::Incomes { file } => {
                    commands::cmd_import_incomes(&mut db, &file, &config)
                }
                ImportAction::Clients { file } => {
                    commands::cmd_import_clients(&mut db, &file, &config)
                }
                ImportAction::All { file } => commands::cmd_import_all(&mut db, &file, &config),
            }
        }
        Commands::Incomes { month, year, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let filter = commands::period_filter(month.as_deref(), year)?;
            commands::cmd_incomes(&db, filter, json)
        }
        Commands::Clients { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_clients(&db, json)
        }
        Commands::Categories => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_categories(&db)
        }
        Commands::Categorize { names } => commands::cmd_categorize(&config, &names),
        Commands::Config => commands::cmd_config(&config),
    }
}

/// Set up logging
///
/// Priority: RUST_LOG env var > --verbose flag > config level > info.
/// With `[logging].file` set, events also go to that file without colors.
fn init_logging(cli: &Cli, config: &MonyConfig) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(config.logging.level.as_deref().unwrap_or("info"))
    };

    let file_layer = match &config.logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();

    Ok(())
}
