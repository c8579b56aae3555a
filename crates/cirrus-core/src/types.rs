//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      User       │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id ("p1")      │   │  trn (key)      │   │  invoice_number │       │
//! │  │  name           │   │  profile        │   │  trn (issuer)   │       │
//! │  │  price          │   │  cart ──────────┼─► │  items          │       │
//! │  │  category       │   │  invoices       │   │  totals         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  The cart lives INSIDE the user record: saving the user saves the cart. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase so stored documents keep the shape the
//! browser front end reads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::PricingRules;
use crate::validation;

// =============================================================================
// TRN (identity key)
// =============================================================================

/// Taxpayer registration number, the identity key of a user.
///
/// Always in the `000-000-000` format; construction validates.
///
/// ```rust
/// use cirrus_core::Trn;
///
/// assert!(Trn::parse("123-456-789").is_ok());
/// assert!(Trn::parse("123456789").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Trn(String);

impl Trn {
    /// Validates and wraps a TRN.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        validation::validate_trn(trimmed)?;
        Ok(Trn(trimmed.to_string()))
    }

    /// Returns the TRN as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Trn {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Trn::parse(&value)
    }
}

impl From<Trn> for String {
    fn from(trn: Trn) -> Self {
        trn.0
    }
}

impl FromStr for Trn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trn::parse(s)
    }
}

impl fmt::Display for Trn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Catalog category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Premium,
    TrainerBox,
    Booster,
    Special,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Premium,
        Category::TrainerBox,
        Category::Booster,
        Category::Special,
    ];

    /// The tag as stored (`trainer-box`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Premium => "premium",
            Category::TrainerBox => "trainer-box",
            Category::Booster => "booster",
            Category::Special => "special",
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "category".to_string(),
                reason: format!("unknown category '{}'", s),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product available in the catalog. Immutable once defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier ("p1", "p2", ...).
    pub id: String,

    /// Display name. Also the cart merge key.
    pub name: String,

    /// Unit price (non-negative).
    pub price: Money,

    /// Image reference for the product card.
    pub image: String,

    pub category: Category,

    pub description: String,
}

// =============================================================================
// User
// =============================================================================

/// Gender as captured on the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male")]
    Male,
    #[serde(alias = "Female")]
    Female,
    #[serde(other)]
    Other,
}

impl FromStr for Gender {
    type Err = ValidationError;

    /// Anything that is not male/female counts as other.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other,
        })
    }
}

/// A registered customer, including their live cart and invoice history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub email: String,

    /// Identity key; unique across registered users.
    pub trn: Trn,

    /// Stored and compared in plaintext.
    pub password: String,

    pub date_of_registration: DateTime<Utc>,

    /// The one active cart of this user.
    #[serde(default)]
    pub cart: Cart,

    /// Invoices this user committed, oldest first.
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

impl User {
    /// "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Raw registration form input. Validated by `Accounts::register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub email: String,
    pub trn: String,
    pub password: String,
}

// =============================================================================
// Invoice
// =============================================================================

/// Where the order ships. Every field is required at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
}

/// One priced line frozen onto an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub name: String,
    pub qty: i64,
    /// Unit price at add-to-cart time.
    pub price: Money,
    pub discount: Money,
    pub tax: Money,
    pub line_total: Money,
}

/// Immutable record of a committed checkout.
///
/// Created only by the order ledger; stored in the buyer's history, the
/// global ledger and the last-invoice slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub company_name: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    /// Issuer identity: the buyer's TRN.
    pub trn: Trn,
    pub shipping: ShippingInfo,
    pub items: Vec<InvoiceLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub change_returned: Money,
}

// =============================================================================
// Settings
// =============================================================================

/// Shop-wide settings the ledger and accounts read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSettings {
    /// Printed at the top of every invoice.
    pub company_name: String,

    /// Invoice numbers are `<prefix><millis>`.
    pub invoice_prefix: String,

    pub pricing: PricingRules,

    /// Failed logins allowed before the account is locked.
    pub max_login_attempts: u32,
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            company_name: "Cirrus Trading Cards".to_string(),
            invoice_prefix: "INV-".to_string(),
            pricing: PricingRules::default(),
            max_login_attempts: 3,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
