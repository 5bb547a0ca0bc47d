//! Income listing commands

use anyhow::{Context, Result};
use chrono::Datelike;
use mony_core::{
    db::Database,
    models::{total_received, Month, PeriodFilter},
};

use super::truncate;

/// Build the period filter for `mony incomes`
///
/// A month without a year means that month of the current year.
pub fn period_filter(month: Option<&str>, year: Option<i32>) -> Result<PeriodFilter> {
    let month = match month {
        Some(m) => Month::parse_filter(m).map_err(|e| anyhow::anyhow!(e))?,
        None => None,
    };
    let year = match (month, year) {
        (Some(_), None) => Some(chrono::Local::now().year()),
        (_, year) => year,
    };
    Ok(PeriodFilter::new(month, year))
}

pub fn cmd_incomes(db: &Database, filter: PeriodFilter, json: bool) -> Result<()> {
    let incomes = db.list_incomes().context("Failed to list incomes")?;
    let incomes = filter.apply(&incomes);

    if json {
        println!("{}", serde_json::to_string_pretty(&incomes)?);
        return Ok(());
    }

    if incomes.is_empty() {
        println!("No incomes found.");
        return Ok(());
    }

    println!(
        "{:<14} {:<9} {:<32} {:<12} {:>12}",
        "NUM", "DATE", "DESCRIPTION", "CLIENT", "RECEIVED"
    );
    println!("{}", "-".repeat(83));

    for income in &incomes {
        let client = income
            .client
            .as_ref()
            .map(|c| c.short_name.as_str())
            .unwrap_or("-");
        println!(
            "{:<14} {:<9} {:<32} {:<12} {:>12.2}",
            truncate(&income.num, 14),
            income.date_formatted(),
            truncate(&income.description, 32),
            truncate(client, 12),
            income.amount_received
        );
    }

    println!("{}", "-".repeat(83));
    println!(
        "{} incomes, {:.2} received",
        incomes.len(),
        total_received(&incomes)
    );

    Ok(())
}

pub fn cmd_categories(db: &Database) -> Result<()> {
    let categories = db
        .list_categories()
        .context("Failed to list categories")?;

    if categories.is_empty() {
        println!("No categories yet. Import an invoice export first.");
        return Ok(());
    }

    println!("📂 Income categories:");
    for category in categories {
        println!("   {}", category);
    }

    Ok(())
}
