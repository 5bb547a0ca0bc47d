//! Client list derivation from invoice descriptions

use std::collections::HashSet;

use csv::StringRecord;
use tracing::{debug, warn};

use super::row::INCOME_COLUMNS;
use crate::models::NewClient;

/// Maps descriptions containing `keyword` to `short_name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortNameRule {
    /// Lower-cased
    pub keyword: String,
    pub short_name: String,
}

impl ShortNameRule {
    pub fn new(keyword: &str, short_name: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            short_name: short_name.to_string(),
        }
    }
}

/// Short name for a client description
///
/// The first rule whose keyword is contained in the lower-cased description
/// wins; with no match the lower-cased description is the short name.
pub fn short_name_for(description: &str, rules: &[ShortNameRule]) -> String {
    let lowered = description.to_lowercase();
    rules
        .iter()
        .find(|rule| lowered.contains(rule.keyword.as_str()))
        .map(|rule| rule.short_name.clone())
        .unwrap_or(lowered)
}

/// Derive distinct clients from data rows (header already removed)
///
/// The trimmed description is the long name. Only the first occurrence of a
/// long name is kept. Output follows first-seen order.
pub fn derive_clients(rows: &[StringRecord], rules: &[ShortNameRule]) -> Vec<NewClient> {
    let mut seen = HashSet::new();
    let mut clients = Vec::new();

    for (i, record) in rows.iter().enumerate() {
        let Some(description) = record.get(INCOME_COLUMNS.description) else {
            warn!(
                "Row {}: no description column, not deriving a client",
                i + 1
            );
            continue;
        };
        let long_name = description.trim();

        if !seen.insert(long_name.to_string()) {
            continue;
        }

        clients.push(NewClient {
            long_name: long_name.to_string(),
            short_name: short_name_for(long_name, rules),
        });
    }

    debug!("Derived {} distinct clients", clients.len());
    clients
}
