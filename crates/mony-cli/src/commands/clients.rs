//! Client listing command

use anyhow::{Context, Result};
use mony_core::db::Database;

use super::truncate;

pub fn cmd_clients(db: &Database, json: bool) -> Result<()> {
    let clients = db.list_clients().context("Failed to list clients")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&clients)?);
        return Ok(());
    }

    if clients.is_empty() {
        println!("No clients found.");
        return Ok(());
    }

    println!("{:<6} {:<40} {:<20}", "ID", "LONG NAME", "SHORT NAME");
    println!("{}", "-".repeat(68));

    for client in &clients {
        println!(
            "{:<6} {:<40} {:<20}",
            client.id,
            truncate(&client.long_name, 40),
            truncate(&client.short_name, 20)
        );
    }

    Ok(())
}
