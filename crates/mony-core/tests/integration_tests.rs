//! Integration tests for mony-core
//!
//! These tests exercise the full CSV file → ingestion → database workflow.

use std::io::Write;

use mony_core::{
    db::Database,
    import::{ingest_clients, ingest_file, ingest_incomes, SkipReason},
    models::{total_received, Month, PeriodFilter},
    Error, MonyConfig,
};
use tempfile::NamedTempFile;

const HEADER: &str = "Fecha;Num;Serie;Cliente;Descripcion;NIF;Direccion;CP;Pais;\
Subtotal;IVA;Retencion;Estado;Forma de pago;Total";

/// Export with three data rows; the second has a date in the wrong layout
fn export_with_bad_date() -> String {
    format!(
        "{HEADER}\n\
05/03/24;F-2024-001;A;Aena;AENA S.M.E., S.A.;A1;;;ES;1.000,00 €;210,00 €;150,00 €;Cobrada;;1.060,00 €\n\
2024-03-12;F-2024-002;A;Banco;Banco Santander;A2;;;ES;500,00 €;105,00 €;-;Cobrada;;605,00 €\n\
20/04/24;F-2024-003;A;Acme;Acme Widgets SL;B3;;;ES;250,00 €;exento;-;Cobrada;;250,00 €\n"
    )
}

/// Two rows billed to the same customer description
fn export_with_repeat_client() -> String {
    format!(
        "{HEADER}\n\
05/03/24;F-2024-001;A;Banco;Banco Santander;A2;;;ES;100,00;21,00;-;Cobrada;;121,00\n\
06/04/24;F-2024-002;A;Banco;Banco Santander;A2;;;ES;200,00;42,00;-;Cobrada;;242,00\n"
    )
}

fn write_export(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write export");
    file
}

// =============================================================================
// Income ingestion
// =============================================================================

#[test]
fn test_bad_row_is_skipped_not_fatal() {
    let mut db = Database::in_memory().expect("Failed to create database");
    let config = MonyConfig::embedded().unwrap();
    let file = write_export(&export_with_bad_date());

    let report = ingest_incomes(file.path(), &mut db, &config.ingestion).unwrap();

    assert_eq!(report.rows, 3);
    assert_eq!(report.imported, 2);
    // Each entry in `skipped` is pushed right after its `warn!`, so one
    // entry means exactly one logged skip
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 2);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::InvalidDate("2024-03-12".to_string())
    );
    // "exento" in the IVA column is stored as zero
    assert_eq!(report.defaulted_fields, 1);

    let stored = db.list_incomes().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].num, "F-2024-001");
    assert_eq!(stored[0].title, "F-2024-001 - Aena");
    assert_eq!(stored[0].amount_received, 1060.0);
    assert_eq!(stored[0].income_source, "Aena");
    assert_eq!(stored[1].num, "F-2024-003");
    assert_eq!(stored[1].iva, 0.0);
}

#[test]
fn test_reimport_duplicates_rows() {
    let mut db = Database::in_memory().unwrap();
    let config = MonyConfig::embedded().unwrap();
    let file = write_export(&export_with_bad_date());

    ingest_incomes(file.path(), &mut db, &config.ingestion).unwrap();
    ingest_incomes(file.path(), &mut db, &config.ingestion).unwrap();

    // No identity key: the second run stores every accepted row again
    assert_eq!(db.count_incomes().unwrap(), 4);
}

#[test]
fn test_missing_file_is_io_error() {
    let mut db = Database::in_memory().unwrap();
    let config = MonyConfig::embedded().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let result = ingest_incomes(&dir.path().join("absent.csv"), &mut db, &config.ingestion);
    assert!(matches!(result, Err(Error::Io(_))));
    assert_eq!(db.count_incomes().unwrap(), 0);
}

#[test]
fn test_ragged_file_is_csv_error() {
    let mut db = Database::in_memory().unwrap();
    let config = MonyConfig::embedded().unwrap();
    let file = write_export(&format!("{HEADER}\n05/03/24;F-1;A\n"));

    let result = ingest_incomes(file.path(), &mut db, &config.ingestion);
    assert!(matches!(result, Err(Error::Csv(_))));
    assert_eq!(db.count_incomes().unwrap(), 0);
}

// =============================================================================
// Client derivation
// =============================================================================

#[test]
fn test_repeat_description_yields_one_client() {
    let mut db = Database::in_memory().unwrap();
    let config = MonyConfig::embedded().unwrap();
    let file = write_export(&export_with_repeat_client());

    let report = ingest_clients(file.path(), &mut db, &config.clients).unwrap();
    assert_eq!(report.derived, 1);
    assert_eq!(report.inserted, 1);

    let clients = db.list_clients().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].long_name, "Banco Santander");
    assert_eq!(clients[0].short_name, "banco");
}

#[test]
fn test_client_pass_does_not_dedupe_against_stored_clients() {
    let mut db = Database::in_memory().unwrap();
    let config = MonyConfig::embedded().unwrap();
    let file = write_export(&export_with_repeat_client());

    ingest_clients(file.path(), &mut db, &config.clients).unwrap();
    ingest_clients(file.path(), &mut db, &config.clients).unwrap();

    assert_eq!(db.count_clients().unwrap(), 2);
}

// =============================================================================
// Full workflow
// =============================================================================

#[test]
fn test_full_import_workflow() {
    let mut db = Database::in_memory().unwrap();
    let config = MonyConfig::embedded().unwrap();
    let file = write_export(&export_with_bad_date());

    let (incomes, clients) = ingest_file(file.path(), &mut db, &config).unwrap();
    assert_eq!(incomes.imported, 2);
    // The client pass reads every data row, including the one with a bad date
    assert_eq!(clients.inserted, 3);

    let stored = db.list_incomes().unwrap();
    let short_names: Vec<Option<&str>> = stored
        .iter()
        .map(|i| i.client.as_ref().map(|c| c.short_name.as_str()))
        .collect();
    assert_eq!(short_names, vec![Some("aena"), Some("acme widgets sl")]);

    let march = PeriodFilter::new(Some(Month::March), Some(2024)).apply(&stored);
    assert_eq!(march.len(), 1);
    assert_eq!(total_received(&stored), 1310.0);

    assert_eq!(
        db.list_categories().unwrap(),
        vec![config.ingestion.category.clone()]
    );
}
