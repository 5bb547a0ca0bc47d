//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `incomes` - Imported invoice rows
//! - `clients` - Client long/short name pairs

use std::path::PathBuf;
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};
use crate::import::IncomeSink;
use crate::models::{NewClient, NewIncome};

mod clients;
mod incomes;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "MONY_DB_KEY";

/// Derive an encryption key from a passphrase using Argon2
///
/// The salt is fixed so a passphrase maps to the same key wherever the
/// database file lives.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this invalidates every existing encrypted database
    const APP_SALT: &[u8; 16] = b"mony-salt-v1-inc";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let output = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(output.as_bytes()))
}

/// Scratch database file removed, with its WAL and SHM siblings, on drop
struct ScratchFile(PathBuf);

impl Drop for ScratchFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
    encrypted: bool,
    // Declared after `pool` so connections close before the file goes
    scratch: Option<Arc<ScratchFile>>,
}

impl Database {
    /// Open an encrypted database
    ///
    /// The SQLCipher key is derived from the passphrase in `MONY_DB_KEY`.
    /// Returns an error if the variable is not set; use `new_unencrypted()`
    /// for a plain SQLite file.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV) {
            Ok(key) => Self::new_with_key(path, Some(&key)),
            Err(_) => Err(Error::Encryption(format!(
                "Database encryption required. Set {} with your passphrase, \
                or pass --no-encrypt to use an unencrypted database.",
                DB_KEY_ENV
            ))),
        }
    }

    /// Open an unencrypted database
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open a database with an explicit passphrase (or none)
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = match passphrase {
            Some(pass) => {
                let key_pragma = format!("PRAGMA key = 'x\"{}\"';", derive_key(pass)?);
                let manager = manager.with_init(move |conn| conn.execute_batch(&key_pragma));
                Pool::builder().max_size(4).build(manager)?
            }
            None => Pool::builder().max_size(4).build(manager)?,
        };

        let db = Self {
            pool,
            db_path: path.to_string(),
            encrypted: passphrase.is_some(),
            scratch: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data. The file is deleted when the last
    /// clone of the database is dropped.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("mony_test_{}_{}.db", std::process::id(), id));
        let path = path.to_string_lossy().into_owned();

        let _ = std::fs::remove_file(&path);

        let mut db = Self::new_unencrypted(&path)?;
        db.scratch = Some(Arc::new(ScratchFile(PathBuf::from(path))));
        Ok(db)
    }

    /// Path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Whether the database was opened with a SQLCipher key
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Create tables if they do not exist yet
    ///
    /// Neither table has a uniqueness constraint: importing the same file
    /// twice stores every row twice.
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS income (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                num TEXT,
                title TEXT NOT NULL,
                description TEXT,
                date DATE NOT NULL,
                amount_received REAL NOT NULL,
                subtotal REAL,
                iva REAL,
                retention REAL,
                category TEXT,
                payment_method TEXT,
                is_recurring BOOLEAN DEFAULT FALSE,
                income_source TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_income_num ON income(num);
            CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);

            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                long_name TEXT NOT NULL,
                short_name TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_clients_long_name ON clients(long_name);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

impl IncomeSink for Database {
    fn insert_income(&mut self, income: &NewIncome) -> Result<i64> {
        Database::insert_income(self, income)
    }

    fn insert_client(&mut self, client: &NewClient) -> Result<i64> {
        Database::insert_client(self, client)
    }
}
