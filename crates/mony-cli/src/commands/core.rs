//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_config` - Show the resolved configuration

use std::path::Path;

use anyhow::{Context, Result};
use mony_core::{db::Database, MonyConfig, TaskCategorizer};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    debug!("Opening database {}", db_path.display());
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    if db.is_encrypted() {
        println!("   🔒 Encryption: ENABLED");
    } else {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import an invoice export: mony import all --file invoices.csv");
    println!("  2. Review incomes: mony incomes");

    Ok(())
}

pub fn cmd_config(config: &MonyConfig) -> Result<()> {
    println!("⚙️  Configuration ({})", config.source);
    println!();
    println!("Ingestion:");
    println!("  Category:       {}", config.ingestion.category);
    println!("  Payment method: {}", config.ingestion.payment_method);
    println!();
    println!("Client short names:");
    for rule in &config.clients {
        println!("  {:<12} → {}", rule.keyword, rule.short_name);
    }
    println!();
    println!("Task categories:");
    let categorizer = TaskCategorizer::from_config(config);
    for category in categorizer.categories() {
        println!(
            "  {} {} ({} keywords)",
            category.icon,
            category.name,
            category.keywords.len()
        );
    }
    let fallback = categorizer.fallback();
    println!("  {} {} (fallback)", fallback.icon, fallback.name);
    println!();
    println!("Logging:");
    println!(
        "  Level: {}",
        config.logging.level.as_deref().unwrap_or("info")
    );
    if let Some(file) = &config.logging.file {
        println!("  File:  {}", file.display());
    }

    Ok(())
}
