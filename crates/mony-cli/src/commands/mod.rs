//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and config commands, shared utilities (open_db)
//! - `import` - Invoice CSV import (incomes, clients, both)
//! - `incomes` - Income and category listings
//! - `clients` - Client listing
//! - `tasks` - Task-list categorization

pub mod clients;
pub mod core;
pub mod import;
pub mod incomes;
pub mod tasks;

// Re-export command functions for main.rs
pub use clients::*;
pub use core::*;
pub use import::*;
pub use incomes::*;
pub use tasks::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
