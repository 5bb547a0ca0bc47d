//! Invoice row normalization
//!
//! Turns one data row of the invoice export into a [`NewIncome`] or a
//! [`SkipReason`]. Date, subtotal and total received must parse; tax and
//! retention fall back to zero.

use csv::StringRecord;
use thiserror::Error;
use tracing::warn;

use super::parse::{parse_amount, parse_date};
use crate::config::IngestionConfig;
use crate::models::NewIncome;

/// Column positions in the invoice export
#[derive(Debug, Clone, Copy)]
pub struct IncomeColumns {
    pub date: usize,
    pub num: usize,
    pub client: usize,
    pub description: usize,
    pub subtotal: usize,
    pub iva: usize,
    pub retention: usize,
    pub total: usize,
}

impl IncomeColumns {
    /// Columns a data row needs for every field to be present
    pub fn min_len(&self) -> usize {
        [
            self.date,
            self.num,
            self.client,
            self.description,
            self.subtotal,
            self.iva,
            self.retention,
            self.total,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

// TODO: confirm with a second year of exports that the layout is stable
// before reading positions from the header row instead.
pub const INCOME_COLUMNS: IncomeColumns = IncomeColumns {
    date: 0,
    num: 1,
    client: 3,
    description: 4,
    subtotal: 9,
    iva: 10,
    retention: 11,
    total: 14,
};

/// Why a data row was not imported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("row has {found} columns, expected at least {expected}")]
    TooFewColumns { found: usize, expected: usize },

    #[error("unparseable date {0:?}")]
    InvalidDate(String),

    #[error("unparseable subtotal {0:?}")]
    InvalidSubtotal(String),

    #[error("unparseable total received {0:?}")]
    InvalidTotal(String),
}

/// Optional amounts that were unreadable and stored as zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultedField {
    Iva,
    Retention,
}

impl DefaultedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iva => "iva",
            Self::Retention => "retention",
        }
    }
}

impl std::fmt::Display for DefaultedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An accepted row
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub income: NewIncome,
    pub defaulted: Vec<DefaultedField>,
}

/// Normalize one data row. `row` is the row's position in the file (the
/// header is row 0) and is only used for log messages.
pub fn normalize_row(
    record: &StringRecord,
    row: usize,
    config: &IngestionConfig,
) -> std::result::Result<NormalizedRow, SkipReason> {
    let cols = INCOME_COLUMNS;
    let expected = cols.min_len();
    if record.len() < expected {
        return Err(SkipReason::TooFewColumns {
            found: record.len(),
            expected,
        });
    }

    let field = |i: usize| record.get(i).unwrap_or("").trim();

    let date_str = field(cols.date);
    let date = parse_date(date_str).map_err(|_| SkipReason::InvalidDate(date_str.to_string()))?;

    let num = field(cols.num);
    let client = field(cols.client);
    let title = format!("{} - {}", num, client);

    let subtotal_str = field(cols.subtotal);
    let subtotal =
        parse_amount(subtotal_str).map_err(|_| SkipReason::InvalidSubtotal(subtotal_str.to_string()))?;

    let mut defaulted = Vec::new();

    let iva_str = field(cols.iva);
    let iva = parse_amount(iva_str).unwrap_or_else(|e| {
        warn!("Row {}: {}, storing {} as 0", row, e, DefaultedField::Iva);
        defaulted.push(DefaultedField::Iva);
        0.0
    });

    let retention_str = field(cols.retention);
    let retention = parse_amount(retention_str).unwrap_or_else(|e| {
        warn!("Row {}: {}, storing {} as 0", row, e, DefaultedField::Retention);
        defaulted.push(DefaultedField::Retention);
        0.0
    });

    let total_str = field(cols.total);
    let amount_received =
        parse_amount(total_str).map_err(|_| SkipReason::InvalidTotal(total_str.to_string()))?;

    Ok(NormalizedRow {
        income: NewIncome {
            num: num.to_string(),
            title,
            description: field(cols.description).to_string(),
            date,
            amount_received,
            subtotal,
            iva,
            retention,
            category: config.category.clone(),
            payment_method: config.payment_method.clone(),
            income_source: client.to_string(),
            is_recurring: false,
        },
        defaulted,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(date: &str, subtotal: &str, iva: &str, retention: &str, total: &str) -> StringRecord {
        StringRecord::from(vec![
            date,
            " F-2024-007 ",
            "",
            " Aena ",
            " AENA S.M.E. ",
            "",
            "",
            "",
            "",
            subtotal,
            iva,
            retention,
            "",
            "",
            total,
        ])
    }

    #[test]
    fn test_min_len() {
        assert_eq!(INCOME_COLUMNS.min_len(), 15);
    }

    #[test]
    fn test_normalize_row() {
        let config = IngestionConfig::default();
        let row = record("05/03/24", "1.000,00 €", "210,00 €", "150,00 €", "1.060,00 €");
        let normalized = normalize_row(&row, 1, &config).unwrap();
        let income = normalized.income;

        assert_eq!(income.num, "F-2024-007");
        assert_eq!(income.title, "F-2024-007 - Aena");
        assert_eq!(income.description, "AENA S.M.E.");
        assert_eq!(income.income_source, "Aena");
        assert_eq!(income.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(income.subtotal, 1000.0);
        assert_eq!(income.iva, 210.0);
        assert_eq!(income.retention, 150.0);
        assert_eq!(income.amount_received, 1060.0);
        assert_eq!(income.category, "Client Payment");
        assert_eq!(income.payment_method, "Bank Transfer");
        assert!(!income.is_recurring);
        assert!(normalized.defaulted.is_empty());
    }

    #[test]
    fn test_normalize_row_uses_configured_constants() {
        let config = IngestionConfig {
            category: "Consulting".to_string(),
            payment_method: "Cash".to_string(),
        };
        let row = record("05/03/24", "10,00", "-", "-", "10,00");
        let income = normalize_row(&row, 1, &config).unwrap().income;
        assert_eq!(income.category, "Consulting");
        assert_eq!(income.payment_method, "Cash");
    }

    #[test]
    fn test_invalid_date_skips() {
        let row = record("2024-03-05", "10,00", "-", "-", "10,00");
        assert_eq!(
            normalize_row(&row, 2, &IngestionConfig::default()),
            Err(SkipReason::InvalidDate("2024-03-05".to_string()))
        );
    }

    #[test]
    fn test_invalid_subtotal_skips() {
        let row = record("05/03/24", "n/a", "-", "-", "10,00");
        assert_eq!(
            normalize_row(&row, 2, &IngestionConfig::default()),
            Err(SkipReason::InvalidSubtotal("n/a".to_string()))
        );
    }

    #[test]
    fn test_invalid_total_skips() {
        let row = record("05/03/24", "10,00", "-", "-", "pending");
        assert_eq!(
            normalize_row(&row, 2, &IngestionConfig::default()),
            Err(SkipReason::InvalidTotal("pending".to_string()))
        );
    }

    #[test]
    fn test_invalid_tax_and_retention_default_to_zero() {
        let row = record("05/03/24", "100,00", "exento", "??", "100,00");
        let normalized = normalize_row(&row, 3, &IngestionConfig::default()).unwrap();
        assert_eq!(normalized.income.iva, 0.0);
        assert_eq!(normalized.income.retention, 0.0);
        assert_eq!(
            normalized.defaulted,
            vec![DefaultedField::Iva, DefaultedField::Retention]
        );
    }

    #[test]
    fn test_defaulted_field_names() {
        assert_eq!(DefaultedField::Iva.as_str(), "iva");
        assert_eq!(DefaultedField::Retention.to_string(), "retention");
    }

    #[test]
    fn test_dash_amounts_are_zero_not_defaulted() {
        let row = record("05/03/24", "100,00", "-", "", "100,00");
        let normalized = normalize_row(&row, 3, &IngestionConfig::default()).unwrap();
        assert_eq!(normalized.income.iva, 0.0);
        assert!(normalized.defaulted.is_empty());
    }

    #[test]
    fn test_short_row_skips() {
        let row = StringRecord::from(vec!["05/03/24", "F-1", "", "Aena", "AENA"]);
        assert_eq!(
            normalize_row(&row, 4, &IngestionConfig::default()),
            Err(SkipReason::TooFewColumns {
                found: 5,
                expected: 15
            })
        );
    }
}
