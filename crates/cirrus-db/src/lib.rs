//! # cirrus-db: Storage Layer for the Cirrus Storefront
//!
//! All persisted storefront state lives in a key-value store as JSON
//! documents. This crate owns that store and every write to it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cirrus Data Flow                                 │
//! │                                                                         │
//! │  cirrus CLI (add, checkout, invoice, ...)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cirrus-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │  Repositories │    │    Store     │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ OrderLedger   │───►│ ProductRepo   │───►│ KeyValueStore│  │   │
//! │  │   │ Accounts      │    │ UserRepo      │    │  ├ Memory    │  │   │
//! │  │   │ CartService   │    │ SessionRepo   │    │  └ Sqlite    │  │   │
//! │  │   │               │    │ InvoiceRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             SQLite: kv_store(key, value, updated_at)            │   │
//! │  │   ~/.local/share/cirrus/cirrus.db (platform data dir)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `KeyValueStore` interface and the in-memory store
//! - [`pool`] - SQLite store and its configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Typed access per logical store
//! - [`ledger`] - Atomic checkout commit and invoice lookups
//! - [`accounts`] - Registration, login, password reset, logout
//! - [`cart`] - Cart mutations on the logged-in user
//! - [`error`] - Storage error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod accounts;
pub mod cart;
pub mod database;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

#[cfg(test)]
mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use accounts::{Accounts, RegistrationStats};
pub use cart::CartService;
pub use database::Database;
pub use error::{DbError, DbResult};
pub use ledger::OrderLedger;
pub use pool::{DbConfig, SqliteStore};
pub use store::{KeyValueStore, MemoryStore, WriteBatch};

// Repository re-exports for convenience
pub use repository::invoice::InvoiceRepository;
pub use repository::keys;
pub use repository::product::ProductRepository;
pub use repository::session::SessionRepository;
pub use repository::user::UserRepository;
