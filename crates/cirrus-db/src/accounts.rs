//! # Accounts
//!
//! Registration, login, password reset and logout against the registry and
//! the session slot.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register(form)                                                         │
//! │    └── auth::new_user() ─► TRN unique? ─► RegistrationData += user      │
//! │                                                                         │
//! │  login(trn, password, &mut attempts)                                    │
//! │    ├── attempts locked ───────────────► AccountLocked                  │
//! │    ├── match in registry ─────────────► loggedInUser = user            │
//! │    └── no match ─► attempts.record_failure() ─► InvalidCredentials /   │
//! │                                                  AccountLocked          │
//! │                                                                         │
//! │  reset_password(trn, new)                                               │
//! │    └── registry entry (+ session copy if it is that user)              │
//! │                                                                         │
//! │  logout() ─► remove loggedInUser                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use cirrus_core::auth::{credentials_match, new_user};
use cirrus_core::stats::{age_group_frequency, gender_frequency, AgeGroupFrequency, GenderFrequency};
use cirrus_core::validation::validate_password;
use cirrus_core::{CoreError, LoginAttempts, RegistrationForm, User};

use crate::error::DbResult;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::store::{KeyValueStore, WriteBatch};

/// Gender and age breakdown of registered users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    pub total: usize,
    pub gender: GenderFrequency,
    pub age_groups: AgeGroupFrequency,
}

/// Account operations.
#[derive(Debug, Clone)]
pub struct Accounts<S> {
    store: S,
}

impl<S: KeyValueStore> Accounts<S> {
    pub fn new(store: S) -> Self {
        Accounts { store }
    }

    fn users(&self) -> UserRepository<S> {
        UserRepository::new(self.store.clone())
    }

    fn session(&self) -> SessionRepository<S> {
        SessionRepository::new(self.store.clone())
    }

    /// Registers a new user as of now.
    pub async fn register(&self, form: RegistrationForm) -> DbResult<User> {
        self.register_at(form, Utc::now()).await
    }

    /// Registers a new user; age is judged against `registered_at`.
    ///
    /// ## Errors
    /// - `InvalidFormat` (TRN), `Underage`, `TooShort` (password)
    /// - `Duplicate` when the TRN is already registered
    pub async fn register_at(
        &self,
        form: RegistrationForm,
        registered_at: DateTime<Utc>,
    ) -> DbResult<User> {
        let user = new_user(form, registered_at)?;
        self.users().insert(&user).await?;

        info!(trn = %user.trn, "User registered");
        Ok(user)
    }

    /// Logs in by exact TRN and password.
    ///
    /// `attempts` is the caller's failure budget; it is only spent on a
    /// mismatch.
    pub async fn login(
        &self,
        trn: &str,
        password: &str,
        attempts: &mut LoginAttempts,
    ) -> DbResult<User> {
        if attempts.is_locked() {
            return Err(CoreError::AccountLocked.into());
        }

        let users = self.users().all().await?;
        let Some(user) = users
            .into_iter()
            .find(|u| credentials_match(u, trn, password))
        else {
            let err = attempts.record_failure();
            warn!(trn = %trn.trim(), remaining = attempts.remaining(), "Login failed");
            return Err(err.into());
        };

        self.session().start(&user).await?;
        info!(trn = %user.trn, "User logged in");
        Ok(user)
    }

    /// Sets a new password for a registered user.
    ///
    /// ## Errors
    /// - `UserNotFound` when the TRN is not registered
    /// - `TooShort` when the new password has fewer than 8 characters
    pub async fn reset_password(&self, trn: &str, new_password: &str) -> DbResult<()> {
        let mut user = self.users().get_by_trn(trn).await?;
        validate_password(new_password)?;
        user.password = new_password.to_string();

        let session = self.session();
        let mut batch = WriteBatch::new();
        match session.current().await? {
            Some(current) if current.trn == user.trn => {
                // Keep the live cart from the session copy.
                let mut current = current;
                current.password = user.password.clone();
                session.stage_save(&current, &mut batch).await?;
            }
            _ => {
                self.users().stage_update(&user, &mut batch).await?;
            }
        }
        self.store.set_many(batch).await?;

        info!(trn = %user.trn, "Password reset");
        Ok(())
    }

    /// Ends the session.
    pub async fn logout(&self) -> DbResult<()> {
        if let Some(user) = self.session().current().await? {
            info!(trn = %user.trn, "User logged out");
        }
        self.session().clear().await
    }

    /// The logged-in user, if any.
    pub async fn current_user(&self) -> DbResult<Option<User>> {
        self.session().current().await
    }

    /// Registration statistics as of the current UTC date, the same clock
    /// [`register`](Self::register) judges ages by.
    pub async fn stats(&self) -> DbResult<RegistrationStats> {
        self.stats_on(Utc::now().date_naive()).await
    }

    /// Registration statistics as of `today`.
    pub async fn stats_on(&self, today: NaiveDate) -> DbResult<RegistrationStats> {
        let users = self.users().all().await?;
        Ok(RegistrationStats {
            total: users.len(),
            gender: gender_frequency(&users),
            age_groups: age_group_frequency(&users, today),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
