//! # Pricing Engine
//!
//! Derives line and cart totals from prices and quantities.
//!
//! ## Line Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = price × qty                                                 │
//! │  discount = 10% of subtotal   if subtotal > 100.00, else 0              │
//! │  tax      = 15% of (subtotal − discount)                                │
//! │  total    = subtotal − discount + tax                                   │
//! │                                                                         │
//! │  Example: 50.00 × 3                                                     │
//! │    subtotal 150.00 → discount 15.00 → tax 20.25 → total 155.25          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount threshold applies per line, not per cart. Nothing here is
//! rounded; see [`Money::round_cents`].

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{validate_price, validate_quantity};

// =============================================================================
// Rules
// =============================================================================

/// Discount and tax parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    /// A line subtotal strictly above this earns the discount.
    pub discount_threshold: Money,

    /// Discount in basis points (1000 = 10%).
    pub discount_rate_bps: u32,

    /// Tax in basis points (1500 = 15%), charged after discount.
    pub tax_rate_bps: u32,
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules {
            discount_threshold: Money::from_cents(10_000),
            discount_rate_bps: 1000,
            tax_rate_bps: 1500,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Derived amounts for one cart line. Never stored on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCalculation {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl LineCalculation {
    fn accumulate(&mut self, other: &LineCalculation) {
        self.subtotal += other.subtotal;
        self.discount += other.discount;
        self.tax += other.tax;
        self.total += other.total;
    }
}

/// A cart line with its calculation attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub line: CartLine,
    pub calc: LineCalculation,
}

/// Component-wise sums over a cart, plus the priced lines in cart order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub lines: Vec<PricedLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Engine
// =============================================================================

/// Computes line and cart totals under a set of [`PricingRules`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingEngine {
    rules: PricingRules,
}

impl PricingEngine {
    /// Creates an engine with the given rules.
    pub fn new(rules: PricingRules) -> Self {
        PricingEngine { rules }
    }

    /// Returns the rules this engine prices with.
    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Prices one line.
    ///
    /// ## Errors
    /// Rejects `price < 0` and `qty < 1`; callers are expected to prevent
    /// both, so no clamping happens here.
    ///
    /// ```rust
    /// use cirrus_core::money::Money;
    /// use cirrus_core::pricing::PricingEngine;
    ///
    /// let calc = PricingEngine::default()
    ///     .compute_line(Money::from_cents(5000), 3)
    ///     .unwrap();
    /// assert_eq!(calc.total, Money::from_cents(15525));
    /// ```
    pub fn compute_line(&self, price: Money, qty: i64) -> CoreResult<LineCalculation> {
        validate_price(price)?;
        validate_quantity(qty)?;

        let subtotal = price.multiply_quantity(qty);
        let discount = if subtotal > self.rules.discount_threshold {
            subtotal.percentage(self.rules.discount_rate_bps)
        } else {
            Money::zero()
        };
        let tax = (subtotal - discount).percentage(self.rules.tax_rate_bps);
        let total = subtotal - discount + tax;

        Ok(LineCalculation {
            subtotal,
            discount,
            tax,
            total,
        })
    }

    /// Prices every line and folds the sums.
    ///
    /// Output lines keep input order. An empty cart gives all-zero totals.
    pub fn compute_cart(&self, lines: &[CartLine]) -> CoreResult<CartTotals> {
        let mut sums = LineCalculation::default();
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            let calc = self.compute_line(line.price, line.qty)?;
            sums.accumulate(&calc);
            priced.push(PricedLine {
                line: line.clone(),
                calc,
            });
        }

        Ok(CartTotals {
            lines: priced,
            subtotal: sums.subtotal,
            discount: sums.discount,
            tax: sums.tax,
            total: sums.total,
        })
    }
}

/// Prices one line under the default rules.
pub fn compute_line(price: Money, qty: i64) -> CoreResult<LineCalculation> {
    PricingEngine::default().compute_line(price, qty)
}

/// Prices a cart under the default rules.
pub fn compute_cart(lines: &[CartLine]) -> CoreResult<CartTotals> {
    PricingEngine::default().compute_cart(lines)
}

// =============================================================================
// Unit Tests
// =============================================================================
