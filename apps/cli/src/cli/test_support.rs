//! Fixtures for command tests.

use chrono::NaiveDate;

use cirrus_core::{Gender, LoginAttempts, ShopSettings};
use cirrus_db::{Database, MemoryStore};

use super::account::RegisterArgs;

pub(crate) const TEST_TRN: &str = "100-200-300";
pub(crate) const TEST_PASSWORD: &str = "staryu-42";

pub(crate) fn register_args(trn: &str) -> RegisterArgs {
    RegisterArgs {
        first_name: "Misty".to_string(),
        last_name: "Waterflower".to_string(),
        dob: NaiveDate::from_ymd_opt(1998, 6, 12).unwrap(),
        gender: Gender::Female,
        phone: "876-555-0144".to_string(),
        email: "misty@example.com".to_string(),
        trn: trn.to_string(),
        password: TEST_PASSWORD.to_string(),
    }
}

/// In-memory database with one registered, logged-in user.
pub(crate) async fn logged_in_db() -> Database<MemoryStore> {
    let db = Database::in_memory(ShopSettings::default());
    super::account::register(&db, register_args(TEST_TRN))
        .await
        .unwrap();
    db.accounts()
        .login(TEST_TRN, TEST_PASSWORD, &mut LoginAttempts::default())
        .await
        .unwrap();
    db
}
