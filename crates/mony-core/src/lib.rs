//! Mony Core Library
//!
//! Shared functionality for the mony income tracker:
//! - Invoice CSV ingestion (amount/date parsing, row normalization, client derivation)
//! - Database access and migrations
//! - Configuration with embedded defaults
//! - Task-list categorization

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod tasks;

/// Test utilities: in-memory sinks and CSV fixtures
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigSource, IngestionConfig, LoggingConfig, MonyConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use import::{ClientReport, IncomeSink, IngestReport, SkipReason, SkippedRow};
pub use models::{Client, Income, Month, NewClient, NewIncome, PeriodFilter};
pub use tasks::{TaskCategorizer, TaskCategory};
