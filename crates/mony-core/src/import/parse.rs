//! Field parsers for the invoice export's locale (European number and date layout)

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Currency glyphs stripped from amounts. The second entry is the euro sign
/// as it appears when a UTF-8 export is re-read as Windows-1252.
const CURRENCY_GLYPHS: &[&str] = &["€", "â‚¬"];

/// Two-digit years always land in this century
const CENTURY: i32 = 2000;

/// Parse an amount like `"1.234,56 €"`
///
/// `.` is a thousands separator and `,` the decimal separator. Empty input
/// and a lone `-` are the export's way of writing zero.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let mut cleaned = raw.replace('.', "").replace(',', ".");
    for glyph in CURRENCY_GLYPHS {
        cleaned = cleaned.replace(glyph, "");
    }
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "-" {
        return Ok(0.0);
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidAmount(raw.to_string()))
}

/// Parse a date in exactly `DD/MM/YY` layout
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate(raw.to_string());

    let parts: Vec<&str> = raw.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };

    let day = two_digits(day).ok_or_else(invalid)?;
    let month = two_digits(month).ok_or_else(invalid)?;
    let year = two_digits(year).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(CENTURY + year as i32, month, day).ok_or_else(invalid)
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.234,56 €").unwrap(), 1234.56);
        assert_eq!(parse_amount(" 1.234,56 € ").unwrap(), 1234.56);
        assert_eq!(parse_amount("250,00€").unwrap(), 250.0);
        assert_eq!(parse_amount("1.000.000,5").unwrap(), 1_000_000.5);
        assert_eq!(parse_amount("-45,10 €").unwrap(), -45.1);
    }

    #[test]
    fn test_parse_amount_zero_sentinels() {
        assert_eq!(parse_amount("-").unwrap(), 0.0);
        assert_eq!(parse_amount("").unwrap(), 0.0);
        assert_eq!(parse_amount("  ").unwrap(), 0.0);
        assert_eq!(parse_amount(" - € ").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_amount_mojibake_euro() {
        assert_eq!(parse_amount("2.500,75 â‚¬").unwrap(), 2500.75);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        let err = parse_amount("abc").unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(ref s) if s == "abc"));
        assert!(parse_amount("12,34,56").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_parse_amount_value_survives_reformatting() {
        for (int_part, frac) in [(1, 5), (12, 34), (999, 99), (1000, 1)] {
            let thousands = int_part / 1000;
            let rest = int_part % 1000;
            let raw = if thousands > 0 {
                format!("{}.{:03},{:02}€", thousands, rest, frac)
            } else {
                format!("{},{:02}€", rest, frac)
            };
            let expected: f64 = format!("{}.{:02}", int_part, frac).parse().unwrap();
            assert_eq!(parse_amount(&raw).unwrap(), expected, "raw: {raw}");
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("05/03/24").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(
            parse_date("31/12/99").unwrap(),
            NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_other_layouts() {
        assert!(parse_date("2024-03-05").is_err());
        assert!(parse_date("5/3/24").is_err());
        assert!(parse_date("05/03/2024").is_err());
        assert!(parse_date("05/03").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_date_rejects_impossible_dates() {
        assert!(parse_date("30/02/24").is_err());
        assert!(parse_date("01/13/24").is_err());
        assert!(parse_date("00/01/24").is_err());
    }

    #[test]
    fn test_parse_date_error_names_input() {
        let err = parse_date("2024-03-05").unwrap_err();
        assert!(err.to_string().contains("2024-03-05"));
    }
}
