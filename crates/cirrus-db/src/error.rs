//! # Database Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error      CoreError (business rules)       │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  DbError (this module) ◄───────── DbError::Core(#[from])               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in the CLI) ← code + human-readable message                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Terminal shows the message; StorageUnavailable ends the session       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cirrus_core::CoreError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The store cannot be reached at all.
    ///
    /// ## When This Occurs
    /// - Pool closed or timed out
    /// - Database file became unreadable mid-session
    ///
    /// Fatal to the current session: every piece of state lives in the store.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Opening the database failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored document did not decode as the expected JSON shape.
    #[error("Stored record '{key}' is corrupt: {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The operation needs a logged-in user and there is none.
    #[error("Please log in first")]
    NotLoggedIn,

    /// Business rule violation raised by cirrus-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DbError {
    /// Creates a CorruptRecord error for a given key.
    pub fn corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        DbError::CorruptRecord {
            key: key.into(),
            source,
        }
    }

    /// Whether the current session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DbError::StorageUnavailable(_) | DbError::ConnectionFailed(_)
        )
    }
}

impl From<cirrus_core::ValidationError> for DbError {
    fn from(err: cirrus_core::ValidationError) -> Self {
        DbError::Core(CoreError::Validation(err))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolClosed     → DbError::StorageUnavailable
/// sqlx::Error::PoolTimedOut   → DbError::StorageUnavailable
/// sqlx::Error::Io             → DbError::StorageUnavailable
/// sqlx::Error::Database       → DbError::QueryFailed
/// Other                       → DbError::QueryFailed
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => {
                DbError::StorageUnavailable("Pool is closed".to_string())
            }
            sqlx::Error::PoolTimedOut => {
                DbError::StorageUnavailable("Timed out waiting for a connection".to_string())
            }
            sqlx::Error::Io(io_err) => DbError::StorageUnavailable(io_err.to_string()),
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            _ => DbError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_closed_is_fatal() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::StorageUnavailable(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: DbError = CoreError::EmptyCart.into();
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Your cart is empty");
    }

    #[test]
    fn test_corrupt_record_names_key() {
        let source = serde_json::from_str::<Vec<u8>>("{oops").unwrap_err();
        let err = DbError::corrupt("AllInvoices", source);
        assert!(err.to_string().starts_with("Stored record 'AllInvoices' is corrupt"));
    }
}
