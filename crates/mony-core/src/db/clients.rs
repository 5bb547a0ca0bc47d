//! Client operations

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{Client, NewClient};

impl Database {
    /// Insert a client. Long names are not unique.
    pub fn insert_client(&self, client: &NewClient) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO clients (long_name, short_name) VALUES (?, ?)",
            params![client.long_name, client.short_name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List all clients in insertion order
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, long_name, short_name FROM clients ORDER BY id")?;

        let clients = stmt
            .query_map([], |row| {
                Ok(Client {
                    id: row.get(0)?,
                    long_name: row.get(1)?,
                    short_name: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(clients)
    }

    pub fn count_clients(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
        Ok(count)
    }
}
