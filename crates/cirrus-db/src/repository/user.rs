//! # User Repository
//!
//! The registry of registered users (`RegistrationData`), keyed implicitly
//! by TRN.

use tracing::debug;

use cirrus_core::{CoreError, Trn, User, ValidationError};

use crate::error::{DbError, DbResult};
use crate::repository::{keys, read_list};
use crate::store::{KeyValueStore, WriteBatch};

/// Repository for the registered-user collection.
#[derive(Debug, Clone)]
pub struct UserRepository<S> {
    store: S,
}

impl<S: KeyValueStore> UserRepository<S> {
    /// Creates a new UserRepository.
    pub fn new(store: S) -> Self {
        UserRepository { store }
    }

    /// All registered users, in registration order.
    pub async fn all(&self) -> DbResult<Vec<User>> {
        read_list(&self.store, keys::REGISTRY).await
    }

    /// Finds a user by TRN.
    pub async fn find_by_trn(&self, trn: &str) -> DbResult<Option<User>> {
        let trn = trn.trim();
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|u| u.trn.as_str() == trn))
    }

    /// Like [`find_by_trn`](Self::find_by_trn), failing with `UserNotFound`.
    pub async fn get_by_trn(&self, trn: &str) -> DbResult<User> {
        self.find_by_trn(trn)
            .await?
            .ok_or_else(|| DbError::Core(CoreError::UserNotFound(trn.trim().to_string())))
    }

    /// Appends a new user.
    ///
    /// ## Errors
    /// `Duplicate` when the TRN is already registered.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        let mut users = self.all().await?;
        if users.iter().any(|u| u.trn == user.trn) {
            return Err(ValidationError::Duplicate {
                field: "TRN".to_string(),
                value: user.trn.to_string(),
            }
            .into());
        }

        debug!(trn = %user.trn, "Inserting user");
        users.push(user.clone());

        let mut batch = WriteBatch::new();
        batch.put_json(keys::REGISTRY, &users)?;
        self.store.set_many(batch).await
    }

    /// Queues a write that replaces the registry entry for `user.trn`.
    ///
    /// Returns `false` (and queues nothing) when no entry has that TRN.
    pub(crate) async fn stage_update(&self, user: &User, batch: &mut WriteBatch) -> DbResult<bool> {
        let mut users = self.all().await?;
        match users.iter_mut().find(|u| u.trn == user.trn) {
            Some(slot) => *slot = user.clone(),
            None => return Ok(false),
        }

        batch.put_json(keys::REGISTRY, &users)?;
        Ok(true)
    }

    /// Replaces the registry entry for `user.trn`.
    ///
    /// ## Errors
    /// `UserNotFound` when the TRN is not registered.
    pub async fn update(&self, user: &User) -> DbResult<()> {
        let mut batch = WriteBatch::new();
        if !self.stage_update(user, &mut batch).await? {
            return Err(CoreError::UserNotFound(user.trn.to_string()).into());
        }

        debug!(trn = %user.trn, "Updating user");
        self.store.set_many(batch).await
    }

    /// Checks whether a TRN is registered.
    pub async fn exists(&self, trn: &Trn) -> DbResult<bool> {
        Ok(self.all().await?.iter().any(|u| &u.trn == trn))
    }
}
