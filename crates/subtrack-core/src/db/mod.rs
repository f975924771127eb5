//! SQLite persistence for subscriptions
//!
//! - `subscriptions` - Subscription CRUD, stats and the `SubscriptionStore` impl
//! - `subscription_filter` - SQL translation of `SubscriptionFilter`
//!
//! Databases are encrypted with SQLCipher unless opened with
//! [`Database::new_unencrypted`]. Months are stored as `YYYY-MM-01` text so
//! string comparison in SQL is chronological.

use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tempfile::TempPath;
use tracing::{debug, info};

use crate::error::{Error, Result};

mod subscription_filter;
mod subscriptions;

pub use subscription_filter::FilterResult;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable holding the encryption passphrase
pub const DB_KEY_ENV: &str = "SUBTRACK_DB_KEY";

const POOL_SIZE: u32 = 8;

/// Argon2 salt; the key depends only on the passphrase, never on the path.
/// Changing it makes every existing encrypted database unreadable.
const KEY_SALT: &[u8] = b"subtrack-salt-v1";

/// Raw 256-bit SQLCipher key for `passphrase`, as a `PRAGMA key` literal
fn key_pragma(passphrase: &str) -> Result<String> {
    let mut key = [0u8; 32];
    argon2::Argon2::default()
        .hash_password_into(passphrase.as_bytes(), KEY_SALT, &mut key)
        .map_err(|e| Error::Encryption(format!("key derivation failed: {}", e)))?;
    Ok(format!("PRAGMA key = \"x'{}'\";", hex::encode(key)))
}

/// Per-connection settings; the key must be applied before anything else
fn configure_connection(conn: &rusqlite::Connection, key: Option<&str>) -> rusqlite::Result<()> {
    if let Some(key) = key {
        conn.execute_batch(key)?;
    }
    conn.execute_batch(
        "PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )
}

/// Pooled handle to the subscriptions database
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Backing file of a scratch database, removed when the last clone drops
    _scratch: Option<Arc<TempPath>>,
}

impl Database {
    /// Open an encrypted database, keyed from `SUBTRACK_DB_KEY`
    pub fn new(path: &str) -> Result<Self> {
        let passphrase = std::env::var(DB_KEY_ENV).map_err(|_| {
            Error::Encryption(format!(
                "{} is not set; export a passphrase or pass --no-encrypt",
                DB_KEY_ENV
            ))
        })?;
        Self::new_with_key(path, Some(&passphrase))
    }

    /// Open without encryption (development and tests)
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open `path`, encrypting with `passphrase` when given
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let pool = Self::build_pool(path, passphrase)?;
        let db = Self {
            pool,
            _scratch: None,
        };
        db.run_migrations()?;
        debug!(path, encrypted = passphrase.is_some(), "Database opened");
        Ok(db)
    }

    /// Unencrypted scratch database in the system temp dir (for testing)
    ///
    /// Backed by a file because every pooled `:memory:` connection would see
    /// its own empty database. The file is deleted on drop.
    pub fn in_memory() -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("subtrack-")
            .suffix(".db")
            .tempfile()?
            .into_temp_path();
        let path = scratch.to_string_lossy().into_owned();

        let db = Self {
            pool: Self::build_pool(&path, None)?,
            _scratch: Some(Arc::new(scratch)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn build_pool(path: &str, passphrase: Option<&str>) -> Result<DbPool> {
        let key = passphrase.map(key_pragma).transpose()?;
        let manager = SqliteConnectionManager::file(path)
            .with_init(move |conn| configure_connection(conn, key.as_deref()));
        Ok(Pool::builder().max_size(POOL_SIZE).build(manager)?)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            -- Persistent; first statement that touches the file, so a wrong key fails here
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS subscriptions (
                id TEXT PRIMARY KEY,                       -- UUID
                user_id TEXT NOT NULL,                     -- UUID
                service_name TEXT NOT NULL,
                price INTEGER NOT NULL CHECK (price >= 0),
                start_month DATE NOT NULL,
                end_month DATE,                            -- NULL = ongoing
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                CHECK (end_month IS NULL OR end_month >= start_month)
            );

            CREATE INDEX IF NOT EXISTS idx_subscriptions_user_start ON subscriptions(user_id, start_month);
            CREATE INDEX IF NOT EXISTS idx_subscriptions_service ON subscriptions(service_name);
            "#,
        )?;

        info!("Database schema ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
