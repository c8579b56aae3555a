//! # Error Types
//!
//! Domain-specific error types for cirrus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cirrus-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cirrus-db errors (separate crate)                                     │
//! │  └── DbError          - Storage failures (wraps CoreError)             │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → Terminal     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure aborts the requested operation without partial effect.
//! Nothing in the system retries automatically.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product with this id exists in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No registered user carries this TRN.
    #[error("No user found for TRN: {0}")]
    UserNotFound(String),

    /// A cart position the caller referenced does not exist.
    ///
    /// ## When This Occurs
    /// - Quantity change on a line that was removed in the meantime
    /// - Remove button wired to a stale index
    #[error("Cart index {index} out of range (cart has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Checkout attempted on an empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A shipping field was left blank at checkout.
    #[error("Please fill in all shipping information ({field} is missing)")]
    IncompleteShipping { field: &'static str },

    /// TRN/password pair did not match a registered user.
    #[error("Incorrect TRN or password. Attempts remaining: {attempts_remaining}")]
    InvalidCredentials { attempts_remaining: u32 },

    /// All login attempts used up.
    #[error("Your account is locked")]
    AccountLocked,

    /// The buyer paid less than the total and declined to continue.
    #[error("Checkout cancelled: amount paid {paid} is less than total {total}")]
    CheckoutCancelled { paid: String, total: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., TRN without dashes).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Registrant is younger than the minimum age.
    #[error("You must be at least {min_age} years old to register (age {age})")]
    Underage { age: i32, min_age: i32 },

    /// Duplicate value (e.g., TRN already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
