//! # Session Repository
//!
//! The single logged-in user (`loggedInUser`), a full copy of the registry
//! entry including the live cart.
//!
//! ## Keeping The Two Copies In Sync
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(user)                                                             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ┌─────────────────────── ONE set_many BATCH ────────────────────────┐ │
//! │  │  loggedInUser      = user                                          │ │
//! │  │  RegistrationData  = registry with entry[user.trn] = user          │ │
//! │  └────────────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  This is the ONE read-modify-write point for a user record.            │
//! │  No compare-and-swap: a second writer in between is overwritten.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use cirrus_core::User;

use crate::error::{DbError, DbResult};
use crate::repository::user::UserRepository;
use crate::repository::{keys, read_json};
use crate::store::{KeyValueStore, WriteBatch};

/// Repository for the session slot.
#[derive(Debug, Clone)]
pub struct SessionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SessionRepository<S> {
    /// Creates a new SessionRepository.
    pub fn new(store: S) -> Self {
        SessionRepository { store }
    }

    /// The logged-in user, if any.
    pub async fn current(&self) -> DbResult<Option<User>> {
        read_json(&self.store, keys::SESSION).await
    }

    /// The logged-in user, failing with `NotLoggedIn`.
    pub async fn require(&self) -> DbResult<User> {
        self.current().await?.ok_or(DbError::NotLoggedIn)
    }

    /// Puts `user` in the session slot without touching the registry.
    pub async fn start(&self, user: &User) -> DbResult<()> {
        debug!(trn = %user.trn, "Starting session");
        let mut batch = WriteBatch::new();
        batch.put_json(keys::SESSION, user)?;
        self.store.set_many(batch).await
    }

    /// Queues the session write plus the matching registry write.
    pub(crate) async fn stage_save(&self, user: &User, batch: &mut WriteBatch) -> DbResult<()> {
        batch.put_json(keys::SESSION, user)?;

        let users = UserRepository::new(self.store.clone());
        if !users.stage_update(user, batch).await? {
            warn!(trn = %user.trn, "Session user missing from registry; saving session only");
        }
        Ok(())
    }

    /// Saves `user` to the session slot and the registry in one batch.
    pub async fn save(&self, user: &User) -> DbResult<()> {
        let mut batch = WriteBatch::new();
        self.stage_save(user, &mut batch).await?;

        debug!(trn = %user.trn, cart_lines = user.cart.len(), "Saving session user");
        self.store.set_many(batch).await
    }

    /// Logs out. Clearing an empty session is fine.
    pub async fn clear(&self) -> DbResult<()> {
        debug!("Clearing session");
        self.store.remove(keys::SESSION).await
    }
}
