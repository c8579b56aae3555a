//! # Database Handle
//!
//! One handle bundling a store with the shop settings, handing out the
//! repositories and services that work on it.
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::open(DbConfig::new("cirrus.db"), ShopSettings::default()).await?;
//!
//! let products = db.products().search("booster", None).await?;
//! db.carts().add("p15").await?;
//! let user = db.session().require().await?;
//! let invoice = db.ledger().commit(&user, &request, &AlwaysProceed).await?;
//! ```

use cirrus_core::ShopSettings;

use crate::accounts::Accounts;
use crate::cart::CartService;
use crate::error::DbResult;
use crate::ledger::OrderLedger;
use crate::pool::{DbConfig, SqliteStore};
use crate::repository::invoice::InvoiceRepository;
use crate::repository::product::ProductRepository;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::store::{KeyValueStore, MemoryStore};

/// Main handle providing repository and service access.
#[derive(Debug, Clone)]
pub struct Database<S> {
    store: S,
    settings: ShopSettings,
}

impl<S: KeyValueStore> Database<S> {
    /// Wraps an already-open store.
    pub fn new(store: S, settings: ShopSettings) -> Self {
        Database { store, settings }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    pub fn products(&self) -> ProductRepository<S> {
        ProductRepository::new(self.store.clone())
    }

    pub fn users(&self) -> UserRepository<S> {
        UserRepository::new(self.store.clone())
    }

    pub fn session(&self) -> SessionRepository<S> {
        SessionRepository::new(self.store.clone())
    }

    pub fn invoices(&self) -> InvoiceRepository<S> {
        InvoiceRepository::new(self.store.clone())
    }

    pub fn ledger(&self) -> OrderLedger<S> {
        OrderLedger::new(self.store.clone(), self.settings.clone())
    }

    pub fn accounts(&self) -> Accounts<S> {
        Accounts::new(self.store.clone())
    }

    pub fn carts(&self) -> CartService<S> {
        CartService::new(self.store.clone(), self.settings.pricing)
    }
}

impl Database<SqliteStore> {
    /// Opens the SQLite database described by `config`.
    pub async fn open(config: DbConfig, settings: ShopSettings) -> DbResult<Self> {
        let store = SqliteStore::open(config).await?;
        Ok(Database::new(store, settings))
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

impl Database<MemoryStore> {
    /// A fresh, empty in-memory database.
    pub fn in_memory(settings: ShopSettings) -> Self {
        Database::new(MemoryStore::new(), settings)
    }
}
