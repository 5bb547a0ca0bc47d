//! Domain models for mony

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A stored income record (one accepted invoice row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    /// Invoice number as written in the export
    pub num: String,
    /// Derived: "<num> - <client>"
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub amount_received: f64,
    pub subtotal: f64,
    /// Tax (IVA) amount
    pub iva: f64,
    pub retention: f64,
    pub category: String,
    pub payment_method: String,
    pub income_source: String,
    pub is_recurring: bool,
    /// Client whose long name equals the income description, if stored
    pub client: Option<Client>,
}

impl Income {
    /// Date in the export's `DD/MM/YY` layout
    pub fn date_formatted(&self) -> String {
        self.date.format("%d/%m/%y").to_string()
    }
}

/// A new income to be stored (before the sink assigns an id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub num: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub amount_received: f64,
    pub subtotal: f64,
    pub iva: f64,
    pub retention: f64,
    pub category: String,
    pub payment_method: String,
    pub income_source: String,
    pub is_recurring: bool,
}

/// A stored client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub long_name: String,
    pub short_name: String,
}

impl std::fmt::Display for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.long_name)
    }
}

/// A derived client mapping, before storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub long_name: String,
    pub short_name: String,
}

/// Calendar months, used for period filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub fn all() -> &'static [Month] {
        &[
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    pub fn short_name(&self) -> &'static str {
        &self.as_str()[..3]
    }

    /// 1-based month number
    pub fn number(&self) -> u32 {
        Self::all()
            .iter()
            .position(|m| m == self)
            .map(|i| i as u32 + 1)
            .unwrap_or(1)
    }

    /// Parse a month filter where "all" / "all year" mean no filter
    pub fn parse_filter(s: &str) -> std::result::Result<Option<Month>, String> {
        let normalized = s.trim().to_lowercase();
        if normalized == "all" || normalized == "all year" {
            return Ok(None);
        }
        normalized.parse().map(Some)
    }
}

impl std::str::FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::all()
            .iter()
            .find(|m| m.as_str().to_lowercase() == s || m.short_name().to_lowercase() == s)
            .copied()
            .ok_or_else(|| format!("Unknown month: {}", s))
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Month/year filter over incomes. `None` matches every value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    pub month: Option<Month>,
    pub year: Option<i32>,
}

impl PeriodFilter {
    pub fn new(month: Option<Month>, year: Option<i32>) -> Self {
        Self { month, year }
    }

    pub fn matches(&self, date: &NaiveDate) -> bool {
        let month_ok = self.month.map_or(true, |m| date.month() == m.number());
        let year_ok = self.year.map_or(true, |y| date.year() == y);
        month_ok && year_ok
    }

    pub fn apply(&self, incomes: &[Income]) -> Vec<Income> {
        incomes
            .iter()
            .filter(|income| self.matches(&income.date))
            .cloned()
            .collect()
    }
}

/// Sum of amount received across incomes
pub fn total_received(incomes: &[Income]) -> f64 {
    incomes.iter().map(|i| i.amount_received).sum()
}
