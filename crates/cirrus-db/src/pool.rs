//! # SQLite Store
//!
//! Connection pool creation and the SQLite-backed [`KeyValueStore`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Key-Value Store                             │
//! │                                                                         │
//! │  CLI Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStore::open(config).await ← Create pool + run migrations        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │  kv_store                                │                           │
//! │  │  ┌──────────────────┬──────────┬──────┐ │                           │
//! │  │  │ key (PK)         │ value    │ upd. │ │                           │
//! │  │  ├──────────────────┼──────────┼──────┤ │                           │
//! │  │  │ RegistrationData │ [..]     │ ...  │ │                           │
//! │  │  │ loggedInUser     │ {..}     │ ...  │ │                           │
//! │  │  │ AllInvoices      │ [..]     │ ...  │ │                           │
//! │  │  │ lastInvoice      │ {..}     │ ...  │ │                           │
//! │  │  │ AllProducts      │ [..]     │ ...  │ │                           │
//! │  │  └──────────────────┴──────────┴──────┘ │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  set_many() = BEGIN; upsert/delete each key; COMMIT                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! WAL journaling keeps readers and the writer out of each other's way and
//! recovers cleanly after a crash.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::store::{KeyValueStore, StoreWrite, WriteBatch};

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/cirrus.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created on first open if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// SqliteStore
// =============================================================================

/// [`KeyValueStore`] over a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database and runs migrations.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures WAL mode and NORMAL synchronous
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let store = SqliteStore { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool. Every later operation fails with `StorageUnavailable`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

const DELETE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "Removing key");

        sqlx::query(DELETE_SQL)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All writes run inside one transaction; dropping it on error rolls
    /// every write back.
    async fn set_many(&self, batch: WriteBatch) -> DbResult<()> {
        debug!(keys = ?batch.keys(), "Writing batch");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for write in batch.into_writes() {
            match write {
                StoreWrite::Set { key, value } => {
                    sqlx::query(UPSERT_SQL)
                        .bind(key)
                        .bind(value)
                        .bind(now)
                        .execute(&mut *tx)
                        .await?;
                }
                StoreWrite::Remove { key } => {
                    sqlx::query(DELETE_SQL)
                        .bind(key)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(dir: &tempfile::TempDir) -> SqliteStore {
        SqliteStore::open(DbConfig::new(dir.path().join("cirrus.db")))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let store = SqliteStore::open(DbConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }

    #[tokio::test]
    async fn test_get_set_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;

        assert_eq!(store.get("lastInvoice").await.unwrap(), None);

        store.set("lastInvoice", "{\"a\":1}".to_string()).await.unwrap();
        store.set("lastInvoice", "{\"a\":2}".to_string()).await.unwrap();
        assert_eq!(
            store.get("lastInvoice").await.unwrap(),
            Some("{\"a\":2}".to_string())
        );

        store.remove("lastInvoice").await.unwrap();
        assert_eq!(store.get("lastInvoice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_many_is_one_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir).await;
        store.set("loggedInUser", "{}".to_string()).await.unwrap();

        let mut batch = WriteBatch::new();
        batch.put_json("AllInvoices", &vec![1, 2]).unwrap();
        batch.put_json("lastInvoice", &2).unwrap();
        batch.remove("loggedInUser");
        store.set_many(batch).await.unwrap();

        assert_eq!(store.get("AllInvoices").await.unwrap(), Some("[1,2]".to_string()));
        assert_eq!(store.get("lastInvoice").await.unwrap(), Some("2".to_string()));
        assert_eq!(store.get("loggedInUser").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = temp_store(&dir).await;
            store.set("AllProducts", "[]".to_string()).await.unwrap();
            store.close().await;
        }

        let store = temp_store(&dir).await;
        assert_eq!(store.get("AllProducts").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let store = SqliteStore::open(DbConfig::in_memory()).await.unwrap();
        store.close().await;

        let err = store.get("AllProducts").await.unwrap_err();
        assert!(matches!(err, DbError::StorageUnavailable(_)));
    }
}
