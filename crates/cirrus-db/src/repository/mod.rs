//! # Repository Module
//!
//! Typed access to the logical stores kept in the key-value store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Logical Stores → Keys                                │
//! │                                                                         │
//! │  ProductRepository  ──► "AllProducts"       Vec<Product> (lazy seed)   │
//! │  UserRepository     ──► "RegistrationData"  Vec<User>                  │
//! │  SessionRepository  ──► "loggedInUser"      User (+ registry sync)     │
//! │  InvoiceRepository  ──► "AllInvoices"       Vec<Invoice>               │
//! │                     ──► "lastInvoice"       Invoice                    │
//! │                                                                         │
//! │  Each value is one JSON document. Every repository is generic over     │
//! │  the store, so tests swap in MemoryStore.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog lookup and search
//! - [`UserRepository`](user::UserRepository) - Registered users
//! - [`SessionRepository`](session::SessionRepository) - The logged-in user
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Ledger reads

pub mod invoice;
pub mod product;
pub mod session;
pub mod user;

use serde::de::DeserializeOwned;

use crate::error::{DbError, DbResult};
use crate::store::KeyValueStore;

/// Storage key names.
pub mod keys {
    /// Registered users, in registration order.
    pub const REGISTRY: &str = "RegistrationData";
    /// The logged-in user's full record, including the live cart.
    pub const SESSION: &str = "loggedInUser";
    /// Global invoice ledger, append-only.
    pub const LEDGER: &str = "AllInvoices";
    /// Most recently committed invoice.
    pub const LAST_INVOICE: &str = "lastInvoice";
    /// Product catalog.
    pub const CATALOG: &str = "AllProducts";
}

/// Reads and decodes the JSON document under `key`.
pub(crate) async fn read_json<S, T>(store: &S, key: &str) -> DbResult<Option<T>>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DbError::corrupt(key, e)),
        None => Ok(None),
    }
}

/// Like [`read_json`], with an absent key read as an empty list.
pub(crate) async fn read_list<S, T>(store: &S, key: &str) -> DbResult<Vec<T>>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    Ok(read_json(store, key).await?.unwrap_or_default())
}
