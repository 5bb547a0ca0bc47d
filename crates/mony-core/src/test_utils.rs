//! Test utilities for mony-core
//!
//! In-memory sinks and invoice CSV fixture builders shared by unit tests,
//! the integration tests and the CLI tests.

use crate::error::{Error, Result};
use crate::import::IncomeSink;
use crate::models::{NewClient, NewIncome};

/// Header of the invoice export (15 columns)
pub const INCOME_HEADER: &str = "Fecha;Num;Serie;Cliente;Descripcion;NIF;Direccion;CP;Pais;\
Subtotal;IVA;Retencion;Estado;Forma de pago;Total";

/// Sink that keeps everything in memory and numbers rows from 1
#[derive(Debug, Default)]
pub struct MemorySink {
    pub incomes: Vec<NewIncome>,
    pub clients: Vec<NewClient>,
}

impl IncomeSink for MemorySink {
    fn insert_income(&mut self, income: &NewIncome) -> Result<i64> {
        self.incomes.push(income.clone());
        Ok(self.incomes.len() as i64)
    }

    fn insert_client(&mut self, client: &NewClient) -> Result<i64> {
        self.clients.push(client.clone());
        Ok(self.clients.len() as i64)
    }
}

/// Sink whose Nth insert (1-based, incomes and clients counted together)
/// and every insert after it fail
#[derive(Debug)]
pub struct FailingSink {
    pub inner: MemorySink,
    fail_on: usize,
    attempts: usize,
}

impl FailingSink {
    pub fn new(fail_on: usize) -> Self {
        Self {
            inner: MemorySink::default(),
            fail_on,
            attempts: 0,
        }
    }

    fn check(&mut self) -> Result<()> {
        self.attempts += 1;
        if self.attempts >= self.fail_on {
            return Err(Error::InvalidData(format!(
                "simulated storage failure on insert {}",
                self.attempts
            )));
        }
        Ok(())
    }
}

impl IncomeSink for FailingSink {
    fn insert_income(&mut self, income: &NewIncome) -> Result<i64> {
        self.check()?;
        self.inner.insert_income(income)
    }

    fn insert_client(&mut self, client: &NewClient) -> Result<i64> {
        self.check()?;
        self.inner.insert_client(client)
    }
}

/// One data row where the subtotal equals the total and tax and retention
/// are `-`
pub fn income_row(date: &str, num: &str, client: &str, description: &str, total: &str) -> String {
    income_row_with(date, num, client, description, total, total, "-", "-")
}

/// One data row with every read column given
#[allow(clippy::too_many_arguments)]
pub fn income_row_with(
    date: &str,
    num: &str,
    client: &str,
    description: &str,
    subtotal: &str,
    total: &str,
    iva: &str,
    retention: &str,
) -> String {
    let mut fields = vec![""; 15];
    fields[0] = date;
    fields[1] = num;
    fields[2] = "A";
    fields[3] = client;
    fields[4] = description;
    fields[9] = subtotal;
    fields[10] = iva;
    fields[11] = retention;
    fields[12] = "Cobrada";
    fields[14] = total;
    fields.join(";")
}

/// A complete export: header plus the given data rows
pub fn income_csv(rows: &[String]) -> String {
    let mut csv = String::from(INCOME_HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    csv
}
