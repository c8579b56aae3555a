//! # cirrus-core: Pure Business Logic for the Cirrus Storefront
//!
//! Pricing, cart and invoice rules for Cirrus Trading Cards, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cirrus Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cirrus CLI (apps/cli)                        │   │
//! │  │    products ──► add ──► cart ──► checkout ──► invoice          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               cirrus-db (Storage Layer)                         │   │
//! │  │    KeyValueStore, repositories, OrderLedger, Accounts          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cirrus-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │   cart    │  │  invoice  │  │  catalog  │  │   │
//! │  │   │  Engine   │  │   Cart    │  │  numbers  │  │   seed    │  │   │
//! │  │   │  Totals   │  │ CartLine  │  │  Invoice  │  │  search   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, Invoice, ...)
//! - [`money`] - Exact decimal money
//! - [`pricing`] - Line and cart totals
//! - [`cart`] - Cart transformations
//! - [`invoice`] - Invoice construction and numbering
//! - [`catalog`] - Seed catalog and search
//! - [`auth`] - Registration and login rules
//! - [`stats`] - Registration statistics
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cirrus_core::{Cart, Money, PricingEngine};
//! use cirrus_core::catalog::{find_by_id, seed_products};
//!
//! let products = seed_products();
//! let bundle = find_by_id(&products, "p15").unwrap();
//!
//! let cart = Cart::new().add_or_increment(bundle).add_or_increment(bundle);
//! let totals = PricingEngine::default().compute_cart(cart.lines()).unwrap();
//!
//! // 44.99 × 2 = 89.98, under the discount threshold; 15% tax on top
//! assert_eq!(totals.subtotal, Money::from_cents(8998));
//! assert_eq!(totals.total.to_string(), "$103.48");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod invoice;
pub mod money;
pub mod pricing;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::LoginAttempts;
pub use cart::{Cart, CartLine, MAX_LINE_QTY};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{AlwaysProceed, CheckoutRequest, Decline, PaymentConfirmation};
pub use money::Money;
pub use pricing::{CartTotals, LineCalculation, PricedLine, PricingEngine, PricingRules};
pub use types::*;
