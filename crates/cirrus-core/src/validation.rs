//! # Validation Module
//!
//! Input validation for registration, checkout and pricing.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (CLI / browser form)                                  │
//! │  └── Parses raw text into typed values (dates, amounts)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── TRN format, age, password length                                  │
//! │  ├── Shipping completeness                                             │
//! │  └── Price / quantity preconditions for pricing                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage (cirrus-db)                                          │
//! │  └── TRN uniqueness against the registered users                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::ShippingInfo;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum registrant age in years.
pub const MIN_REGISTRATION_AGE: i32 = 18;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// Identity & Credentials
// =============================================================================

/// Validates a TRN against the `000-000-000` pattern.
///
/// ```rust
/// use cirrus_core::validation::validate_trn;
///
/// assert!(validate_trn("123-456-789").is_ok());
/// assert!(validate_trn("123456789").is_err());
/// ```
pub fn validate_trn(trn: &str) -> ValidationResult<()> {
    if trn.is_empty() {
        return Err(ValidationError::Required {
            field: "TRN".to_string(),
        });
    }

    let bytes = trn.as_bytes();
    let well_formed = bytes.len() == 11
        && bytes.iter().enumerate().all(|(i, b)| match i {
            3 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "TRN".to_string(),
            reason: "must be in format 000-000-000".to_string(),
        });
    }

    Ok(())
}

/// Validates a password (minimum 8 characters).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "Password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Whole years between `dob` and `today`.
///
/// A birthday not yet reached this year does not count.
///
/// ```rust
/// use chrono::NaiveDate;
/// use cirrus_core::validation::calculate_age;
///
/// let dob = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
/// let before = NaiveDate::from_ymd_opt(2018, 6, 14).unwrap();
/// let on = NaiveDate::from_ymd_opt(2018, 6, 15).unwrap();
/// assert_eq!(calculate_age(dob, before), 17);
/// assert_eq!(calculate_age(dob, on), 18);
/// ```
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Rejects registrants younger than [`MIN_REGISTRATION_AGE`].
pub fn validate_age(dob: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    let age = calculate_age(dob, today);
    if age < MIN_REGISTRATION_AGE {
        return Err(ValidationError::Underage {
            age,
            min_age: MIN_REGISTRATION_AGE,
        });
    }

    Ok(())
}

// =============================================================================
// Checkout
// =============================================================================

/// Requires every shipping field to be non-blank.
///
/// Fields are checked in form order; the first blank one is reported.
pub fn validate_shipping(shipping: &ShippingInfo) -> CoreResult<()> {
    let fields: [(&'static str, &str); 5] = [
        ("full name", &shipping.full_name),
        ("email", &shipping.email),
        ("address", &shipping.address),
        ("city", &shipping.city),
        ("zip code", &shipping.zip_code),
    ];

    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(CoreError::IncompleteShipping { field: *field }),
        None => Ok(()),
    }
}

// =============================================================================
// Pricing Preconditions
// =============================================================================

/// Validates a unit price (zero allowed, negative rejected).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a line quantity (must be at least 1).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a rate in basis points (0% to 100%).
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_trn() {
        assert!(validate_trn("123-456-789").is_ok());
        assert!(validate_trn("000-000-000").is_ok());

        assert!(validate_trn("123456789").is_err());
        assert!(validate_trn("").is_err());
        assert!(validate_trn("123-456-78").is_err());
        assert!(validate_trn("123-456-7890").is_err());
        assert!(validate_trn("12a-456-789").is_err());
        assert!(validate_trn("123_456_789").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter22").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_calculate_age_birthday_boundary() {
        let dob = date(2000, 2, 29);
        assert_eq!(calculate_age(dob, date(2018, 2, 28)), 17);
        assert_eq!(calculate_age(dob, date(2018, 3, 1)), 18);
    }

    #[test]
    fn test_validate_age() {
        let today = date(2026, 10, 17);
        assert!(validate_age(date(2008, 10, 17), today).is_ok());
        assert!(matches!(
            validate_age(date(2008, 10, 18), today),
            Err(ValidationError::Underage { age: 17, .. })
        ));
    }

    #[test]
    fn test_validate_shipping() {
        let mut shipping = ShippingInfo {
            full_name: "Ash Ketchum".to_string(),
            email: "ash@example.com".to_string(),
            address: "1 Route".to_string(),
            city: "Pallet".to_string(),
            zip_code: "00001".to_string(),
        };
        assert!(validate_shipping(&shipping).is_ok());

        shipping.city = "   ".to_string();
        assert!(matches!(
            validate_shipping(&shipping),
            Err(CoreError::IncompleteShipping { field: "city" })
        ));
    }

    #[test]
    fn test_validate_price_and_quantity() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());

        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps("tax_rate", 1500).is_ok());
        assert!(validate_rate_bps("tax_rate", 10_001).is_err());
    }
}
