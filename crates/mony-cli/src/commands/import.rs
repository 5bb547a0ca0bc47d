//! Import command implementations

use std::path::Path;

use anyhow::{Context, Result};
use mony_core::{
    db::Database,
    import::{ingest_clients, ingest_file, ingest_incomes},
    ClientReport, IngestReport, MonyConfig,
};

pub fn cmd_import_incomes(db: &mut Database, file: &Path, config: &MonyConfig) -> Result<()> {
    println!("📥 Importing incomes from {}...", file.display());

    let report = ingest_incomes(file, db, &config.ingestion)
        .with_context(|| format!("Failed to import incomes from {}", file.display()))?;

    print_income_report(&report);
    Ok(())
}

pub fn cmd_import_clients(db: &mut Database, file: &Path, config: &MonyConfig) -> Result<()> {
    println!("📥 Deriving clients from {}...", file.display());

    let report = ingest_clients(file, db, &config.clients)
        .with_context(|| format!("Failed to import clients from {}", file.display()))?;

    print_client_report(&report);
    Ok(())
}

pub fn cmd_import_all(db: &mut Database, file: &Path, config: &MonyConfig) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let (incomes, clients) = ingest_file(file, db, config)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    print_income_report(&incomes);
    print_client_report(&clients);
    Ok(())
}

fn print_income_report(report: &IngestReport) {
    println!("✅ Income import complete!");
    println!("   Rows:     {}", report.rows);
    println!("   Imported: {}", report.imported);
    println!("   Skipped:  {}", report.skipped.len());
    for skipped in &report.skipped {
        println!("     - row {}: {}", skipped.row, skipped.reason);
    }
    if report.defaulted_fields > 0 {
        println!(
            "   ⚠️  {} unreadable tax/retention values stored as 0",
            report.defaulted_fields
        );
    }
}

fn print_client_report(report: &ClientReport) {
    println!("✅ Client import complete!");
    println!("   Distinct clients: {}", report.derived);
    println!("   Inserted:         {}", report.inserted);
}
