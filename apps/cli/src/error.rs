//! # CLI Error Type
//!
//! Unified error type for every command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cirrus CLI                         │
//! │                                                                         │
//! │  cirrus checkout --paid 120 ...                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<(), AppError>                                            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError::StorageUnavailable ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule Violation? ─── CoreError::EmptyCart ──────── AppError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error[CHECKOUT_ERROR]: Your cart is empty                      │
//! │  exit code: 1 (rule / input), 2 (storage, fatal), 3 (config)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::process::ExitCode;

use cirrus_core::{CoreError, ValidationError};
use cirrus_db::DbError;

use crate::config::ConfigError;

/// Error returned from CLI commands.
#[derive(Debug, Clone)]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Product or user not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Command needs a logged-in user
    NotLoggedIn,

    /// TRN/password mismatch
    InvalidCredentials,

    /// Login attempts exhausted
    AccountLocked,

    /// Cart operation failed
    CartError,

    /// Checkout could not be completed
    CheckoutError,

    /// The store cannot be reached; the session cannot continue
    StorageUnavailable,

    /// Stored data could not be read back
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotLoggedIn => "NOT_LOGGED_IN",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::AccountLocked => "ACCOUNT_LOCKED",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::CheckoutError => "CHECKOUT_ERROR",
            ErrorCode::StorageUnavailable => "STORAGE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl AppError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Storage loss ends the session; there is no retry.
    pub fn is_fatal(&self) -> bool {
        self.code == ErrorCode::StorageUnavailable
    }

    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self.code {
            ErrorCode::StorageUnavailable | ErrorCode::DatabaseError => 2,
            ErrorCode::ConfigError => 3,
            _ => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Converts storage errors to CLI errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::StorageUnavailable(e) => {
                tracing::error!("Storage unavailable: {}", e);
                AppError::new(
                    ErrorCode::StorageUnavailable,
                    "Storage is unavailable; nothing was saved",
                )
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Connection failed: {}", e);
                AppError::new(ErrorCode::StorageUnavailable, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            err @ DbError::CorruptRecord { .. } => {
                AppError::new(ErrorCode::DatabaseError, err.to_string())
            }
            DbError::NotLoggedIn => {
                AppError::new(ErrorCode::NotLoggedIn, DbError::NotLoggedIn.to_string())
            }
            DbError::Core(e) => AppError::from(e),
        }
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) | CoreError::UserNotFound(_) => ErrorCode::NotFound,
            CoreError::IndexOutOfRange { .. } => ErrorCode::CartError,
            CoreError::EmptyCart
            | CoreError::IncompleteShipping { .. }
            | CoreError::CheckoutCancelled { .. } => ErrorCode::CheckoutError,
            CoreError::InvalidCredentials { .. } => ErrorCode::InvalidCredentials,
            CoreError::AccountLocked => ErrorCode::AccountLocked,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::validation(format!("Could not read input: {}", err))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
