//! Income operations

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{Client, Income, NewIncome};

impl Database {
    /// Insert an income row. No uniqueness is enforced.
    pub fn insert_income(&self, income: &NewIncome) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO income (num, title, description, date, amount_received, subtotal,
                                iva, retention, category, payment_method, is_recurring,
                                income_source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                income.num,
                income.title,
                income.description,
                income.date.format("%Y-%m-%d").to_string(),
                income.amount_received,
                income.subtotal,
                income.iva,
                income.retention,
                income.category,
                income.payment_method,
                income.is_recurring,
                income.income_source,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all incomes sorted by invoice number
    ///
    /// Each income carries the client whose long name equals its description.
    /// When several stored clients share that long name the lowest id wins.
    pub fn list_incomes(&self) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT i.id, i.num, i.title, i.description, i.date, i.amount_received,
                   i.subtotal, i.iva, i.retention, i.category, i.payment_method,
                   i.is_recurring, i.income_source,
                   c.id, c.long_name, c.short_name
            FROM income i
            LEFT JOIN clients c ON c.id = (
                SELECT MIN(id) FROM clients WHERE long_name = i.description
            )
            ORDER BY i.num, i.id
            "#,
        )?;

        let incomes = stmt
            .query_map([], |row| {
                let date_str: String = row.get(4)?;
                let client_id: Option<i64> = row.get(13)?;
                let client = match client_id {
                    Some(id) => Some(Client {
                        id,
                        long_name: row.get(14)?,
                        short_name: row.get(15)?,
                    }),
                    None => None,
                };

                Ok(Income {
                    id: row.get(0)?,
                    num: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    title: row.get(2)?,
                    description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            4,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    amount_received: row.get(5)?,
                    subtotal: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
                    iva: row.get::<_, Option<f64>>(7)?.unwrap_or_default(),
                    retention: row.get::<_, Option<f64>>(8)?.unwrap_or_default(),
                    category: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
                    payment_method: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
                    is_recurring: row.get::<_, Option<bool>>(11)?.unwrap_or(false),
                    income_source: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
                    client,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(incomes)
    }

    /// Distinct income categories, alphabetically
    pub fn list_categories(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM income WHERE category IS NOT NULL ORDER BY category",
        )?;

        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(categories)
    }

    pub fn count_incomes(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM income", [], |row| row.get(0))?;
        Ok(count)
    }
}
