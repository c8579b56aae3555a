//! # Registration Statistics
//!
//! Frequency tables over registered users for the dashboard report.
//!
//! ```text
//!   Gender                 Age group
//!   ──────                 ─────────
//!   male     ██ 2          18-25  ███ 3
//!   female   █  1          26-35  █   1
//!   other       0          36-50      0
//!                          50+    █   1
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Gender, User};
use crate::validation::{calculate_age, MIN_REGISTRATION_AGE};

/// Users per gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderFrequency {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

/// Users per age bracket.
///
/// Users younger than the registration age (possible only for records that
/// predate the age rule) fall in no bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroupFrequency {
    #[serde(rename = "18-25")]
    pub age_18_25: usize,
    #[serde(rename = "26-35")]
    pub age_26_35: usize,
    #[serde(rename = "36-50")]
    pub age_36_50: usize,
    #[serde(rename = "50+")]
    pub over_50: usize,
}

impl AgeGroupFrequency {
    /// `(label, count)` pairs in display order.
    pub fn rows(&self) -> [(&'static str, usize); 4] {
        [
            ("18-25", self.age_18_25),
            ("26-35", self.age_26_35),
            ("36-50", self.age_36_50),
            ("50+", self.over_50),
        ]
    }
}

pub fn gender_frequency(users: &[User]) -> GenderFrequency {
    users
        .iter()
        .fold(GenderFrequency::default(), |mut freq, user| {
            match user.gender {
                Gender::Male => freq.male += 1,
                Gender::Female => freq.female += 1,
                Gender::Other => freq.other += 1,
            }
            freq
        })
}

/// Buckets users by age as of `today`.
pub fn age_group_frequency(users: &[User], today: NaiveDate) -> AgeGroupFrequency {
    let mut freq = AgeGroupFrequency::default();

    for user in users {
        match calculate_age(user.dob, today) {
            age if age < MIN_REGISTRATION_AGE => {}
            18..=25 => freq.age_18_25 += 1,
            26..=35 => freq.age_26_35 += 1,
            36..=50 => freq.age_36_50 += 1,
            _ => freq.over_50 += 1,
        }
    }

    freq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::types::Trn;
    use chrono::{TimeZone, Utc};

    fn user(n: u32, dob: NaiveDate, gender: Gender) -> User {
        User {
            first_name: format!("User{}", n),
            last_name: "Test".to_string(),
            dob,
            gender,
            phone: String::new(),
            email: String::new(),
            trn: Trn::parse(&format!("100-000-{:03}", n)).unwrap(),
            password: "password1".to_string(),
            date_of_registration: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            cart: Cart::new(),
            invoices: Vec::new(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_gender_frequency() {
        let users = vec![
            user(1, date(2000, 1, 1), Gender::Male),
            user(2, date(2000, 1, 1), Gender::Female),
            user(3, date(2000, 1, 1), Gender::Male),
            user(4, date(2000, 1, 1), Gender::Other),
        ];
        assert_eq!(
            gender_frequency(&users),
            GenderFrequency {
                male: 2,
                female: 1,
                other: 1
            }
        );
    }

    #[test]
    fn test_age_group_boundaries() {
        let today = date(2026, 10, 17);
        let users = vec![
            user(1, date(2008, 10, 17), Gender::Male), // 18
            user(2, date(2000, 10, 18), Gender::Male), // 25
            user(3, date(2000, 10, 17), Gender::Male), // 26
            user(4, date(1976, 10, 17), Gender::Male), // 50
            user(5, date(1976, 10, 16), Gender::Male), // 50
            user(6, date(1975, 10, 17), Gender::Male), // 51
            user(7, date(2010, 1, 1), Gender::Male),   // 16, no bracket
        ];

        let freq = age_group_frequency(&users, today);
        assert_eq!(freq.age_18_25, 2);
        assert_eq!(freq.age_26_35, 1);
        assert_eq!(freq.age_36_50, 2);
        assert_eq!(freq.over_50, 1);
    }

    #[test]
    fn test_age_group_labels_serialize() {
        let json = serde_json::to_value(AgeGroupFrequency::default()).unwrap();
        assert!(json.get("18-25").is_some());
        assert!(json.get("50+").is_some());
    }
}
