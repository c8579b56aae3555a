//! # Registration & Login Rules
//!
//! The storage-free half of account handling. Uniqueness of the TRN needs
//! the registry, so it is checked by `Accounts` in cirrus-db.
//!
//! ## Login Lockout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   remaining = 3                                                         │
//! │        │                                                                │
//! │   bad password ──► remaining = 2 ──► InvalidCredentials { 2 }          │
//! │   bad password ──► remaining = 1 ──► InvalidCredentials { 1 }          │
//! │   bad password ──► remaining = 0 ──► AccountLocked                     │
//! │   any attempt  ──────────────────►  AccountLocked (stays locked)       │
//! │                                                                         │
//! │  The counter belongs to the caller (one per login screen), not to the  │
//! │  stored user: restarting the login screen starts over.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Passwords are stored and compared in plaintext.

use chrono::{DateTime, Utc};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::{RegistrationForm, Trn, User};
use crate::validation::{validate_age, validate_password};

/// Failed-login budget for one login session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginAttempts {
    remaining: u32,
}

impl LoginAttempts {
    pub fn new(max_attempts: u32) -> Self {
        LoginAttempts {
            remaining: max_attempts,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_locked(&self) -> bool {
        self.remaining == 0
    }

    /// Spends one attempt and returns the error to show.
    pub fn record_failure(&mut self) -> CoreError {
        self.remaining = self.remaining.saturating_sub(1);
        if self.is_locked() {
            CoreError::AccountLocked
        } else {
            CoreError::InvalidCredentials {
                attempts_remaining: self.remaining,
            }
        }
    }
}

impl Default for LoginAttempts {
    fn default() -> Self {
        LoginAttempts::new(3)
    }
}

/// Exact TRN and password match.
pub fn credentials_match(user: &User, trn: &str, password: &str) -> bool {
    user.trn.as_str() == trn.trim() && user.password == password
}

/// Validates a registration form and builds the new user.
///
/// Checks run in form order: TRN format, age, password length. The cart and
/// invoice history start empty.
pub fn new_user(form: RegistrationForm, registered_at: DateTime<Utc>) -> CoreResult<User> {
    let trn = Trn::parse(&form.trn)?;
    validate_age(form.dob, registered_at.date_naive())?;
    validate_password(&form.password)?;

    Ok(User {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        dob: form.dob,
        gender: form.gender,
        phone: form.phone.trim().to_string(),
        email: form.email.trim().to_string(),
        trn,
        password: form.password,
        date_of_registration: registered_at,
        cart: Cart::new(),
        invoices: Vec::new(),
    })
}
