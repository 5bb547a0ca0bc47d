//! Invoice CSV ingestion
//!
//! The invoice export is a semicolon-separated file with a mandatory header
//! row. Two passes run over the same parsed rows:
//! - incomes: every data row is normalized and written to the sink; bad rows
//!   are skipped and reported, never fatal
//! - clients: distinct descriptions become client long/short name pairs
//!
//! File, CSV structure and sink errors abort the pass. Rows inserted before
//! the failure stay stored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{IngestionConfig, MonyConfig};
use crate::error::Result;
use crate::models::{NewClient, NewIncome};

mod clients;
mod parse;
mod row;

pub use clients::{derive_clients, short_name_for, ShortNameRule};
pub use parse::{parse_amount, parse_date};
pub use row::{
    normalize_row, DefaultedField, IncomeColumns, NormalizedRow, SkipReason, INCOME_COLUMNS,
};

/// Storage for imported records. Identifiers are assigned by the sink.
pub trait IncomeSink {
    fn insert_income(&mut self, income: &NewIncome) -> Result<i64>;
    fn insert_client(&mut self, client: &NewClient) -> Result<i64>;
}

/// A data row that was not imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Position in the file; the header is row 0
    pub row: usize,
    #[serde(serialize_with = "serialize_display")]
    pub reason: SkipReason,
}

/// Outcome of an income ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Data rows seen (header excluded)
    pub rows: usize,
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
    /// Tax or retention values stored as zero because they were unreadable
    pub defaulted_fields: usize,
}

/// Outcome of a client derivation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientReport {
    pub derived: usize,
    pub inserted: usize,
}

fn serialize_display<S: serde::Serializer>(
    value: &SkipReason,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Read every record of a semicolon-separated file, header included
///
/// Records must all have the same number of fields; a ragged file is a CSV
/// error. A quote inside an unquoted field is kept as a literal character.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<StringRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }
    Ok(rows)
}

fn read_file(path: &Path) -> Result<Vec<StringRecord>> {
    let file = File::open(path)?;
    let rows = read_rows(file)?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Import incomes from an invoice export file
pub fn ingest_incomes<S: IncomeSink>(
    path: &Path,
    sink: &mut S,
    config: &IngestionConfig,
) -> Result<IngestReport> {
    let rows = read_file(path)?;
    insert_incomes(&rows, sink, config)
}

/// Import incomes from any reader holding an invoice export
pub fn ingest_incomes_from_reader<R: Read, S: IncomeSink>(
    reader: R,
    sink: &mut S,
    config: &IngestionConfig,
) -> Result<IngestReport> {
    let rows = read_rows(reader)?;
    insert_incomes(&rows, sink, config)
}

/// Derive clients from an invoice export file and store them
pub fn ingest_clients<S: IncomeSink>(
    path: &Path,
    sink: &mut S,
    rules: &[ShortNameRule],
) -> Result<ClientReport> {
    let rows = read_file(path)?;
    insert_clients(&rows, sink, rules)
}

/// Derive clients from any reader holding an invoice export
pub fn ingest_clients_from_reader<R: Read, S: IncomeSink>(
    reader: R,
    sink: &mut S,
    rules: &[ShortNameRule],
) -> Result<ClientReport> {
    let rows = read_rows(reader)?;
    insert_clients(&rows, sink, rules)
}

/// Run both passes over one file, parsing it once
pub fn ingest_file<S: IncomeSink>(
    path: &Path,
    sink: &mut S,
    config: &MonyConfig,
) -> Result<(IngestReport, ClientReport)> {
    let rows = read_file(path)?;
    let incomes = insert_incomes(&rows, sink, &config.ingestion)?;
    let clients = insert_clients(&rows, sink, &config.clients)?;
    Ok((incomes, clients))
}

fn insert_incomes<S: IncomeSink>(
    rows: &[StringRecord],
    sink: &mut S,
    config: &IngestionConfig,
) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    let Some((header, data)) = rows.split_first() else {
        info!("Income file is empty, nothing to import");
        return Ok(report);
    };
    debug!("Skipping header row ({} columns)", header.len());

    for (i, record) in data.iter().enumerate() {
        let row = i + 1;
        report.rows += 1;

        let normalized = match normalize_row(record, row, config) {
            Ok(normalized) => normalized,
            Err(reason) => {
                warn!("Skipping row {}: {}", row, reason);
                report.skipped.push(SkippedRow { row, reason });
                continue;
            }
        };

        let id = sink.insert_income(&normalized.income)?;
        debug!(
            "Inserted income {} ({}) as id {}",
            normalized.income.num, normalized.income.title, id
        );

        report.imported += 1;
        report.defaulted_fields += normalized.defaulted.len();
    }

    info!(
        "Imported {} of {} income rows ({} skipped)",
        report.imported,
        report.rows,
        report.skipped.len()
    );
    Ok(report)
}

fn insert_clients<S: IncomeSink>(
    rows: &[StringRecord],
    sink: &mut S,
    rules: &[ShortNameRule],
) -> Result<ClientReport> {
    let data = rows.get(1..).unwrap_or_default();
    let clients = derive_clients(data, rules);

    let mut report = ClientReport {
        derived: clients.len(),
        inserted: 0,
    };

    for client in &clients {
        let id = sink.insert_client(client)?;
        debug!(
            "Inserted client {} ({}) as id {}",
            client.long_name, client.short_name, id
        );
        report.inserted += 1;
    }

    info!("Inserted {} clients", report.inserted);
    Ok(report)
}
