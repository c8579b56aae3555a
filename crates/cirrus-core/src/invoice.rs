//! # Invoice Construction
//!
//! Turns a priced cart into an immutable [`Invoice`] value.
//!
//! ## Checkout Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  user.cart ──► non-empty? ──► shipping complete? ──► compute_cart()    │
//! │                   │                  │                     │            │
//! │              EmptyCart      IncompleteShipping             ▼            │
//! │                                                   paid < total?         │
//! │                                                    │         │          │
//! │                                          confirm? ─┘         │ no       │
//! │                                           │   │              │          │
//! │                           CheckoutCancelled   yes ──────────►▼          │
//! │                                                       round to cents    │
//! │                                                       number + date     │
//! │                                                          Invoice        │
//! │                                                                         │
//! │  Persisting the invoice is NOT done here; see cirrus-db's OrderLedger. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{CartTotals, PricingEngine};
use crate::types::{Invoice, InvoiceLine, ShippingInfo, ShopSettings, User};
use crate::validation::validate_shipping;

// =============================================================================
// Payment Confirmation
// =============================================================================

/// Asked whether to go ahead when the amount paid is below the total.
///
/// Underpayment is a soft warning: the ledger records whatever was paid,
/// but only after the buyer says yes.
pub trait PaymentConfirmation {
    fn confirm_underpayment(&self, paid: Money, total: Money) -> bool;
}

impl<F> PaymentConfirmation for F
where
    F: Fn(Money, Money) -> bool,
{
    fn confirm_underpayment(&self, paid: Money, total: Money) -> bool {
        self(paid, total)
    }
}

/// Proceeds on every underpayment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysProceed;

impl PaymentConfirmation for AlwaysProceed {
    fn confirm_underpayment(&self, _paid: Money, _total: Money) -> bool {
        true
    }
}

/// Refuses every underpayment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl PaymentConfirmation for Decline {
    fn confirm_underpayment(&self, _paid: Money, _total: Money) -> bool {
        false
    }
}

// =============================================================================
// Numbering
// =============================================================================

/// Picks the next invoice number `<prefix><millis>`.
///
/// The stamp is the commit time, bumped past the largest stamp already in
/// use so two commits inside the same millisecond still get distinct,
/// increasing numbers. Numbers that do not carry `prefix` are ignored.
///
/// ```rust
/// use cirrus_core::invoice::next_invoice_number;
///
/// assert_eq!(next_invoice_number("INV-", 1_000, []), "INV-1000");
/// assert_eq!(next_invoice_number("INV-", 1_000, ["INV-1000"]), "INV-1001");
/// ```
pub fn next_invoice_number<'a, I>(prefix: &str, now_ms: i64, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = existing
        .into_iter()
        .filter_map(|n| n.strip_prefix(prefix))
        .filter_map(|stamp| stamp.parse::<i64>().ok())
        .max();

    let stamp = match highest {
        Some(h) if h >= now_ms => h + 1,
        _ => now_ms,
    };

    format!("{}{}", prefix, stamp)
}

// =============================================================================
// Building
// =============================================================================

/// `max(paid − total, 0)`.
pub fn change_returned(amount_paid: Money, total: Money) -> Money {
    (amount_paid - total).max_zero()
}

/// Everything needed to freeze a cart into an invoice.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub shipping: ShippingInfo,
    pub amount_paid: Money,
}

/// Builds the invoice for `user`'s current cart.
///
/// Preconditions are checked in this order: cart non-empty, shipping
/// complete, then underpayment confirmation. Line amounts and totals are
/// rounded to cents here; totals are rounded from the full-precision sums,
/// not summed from rounded lines.
///
/// `invoice_number` comes from [`next_invoice_number`]. The invoice date is
/// the UTC calendar date of `issued_at`.
pub fn prepare_invoice<C>(
    settings: &ShopSettings,
    user: &User,
    request: &CheckoutRequest,
    confirm: &C,
    invoice_number: String,
    issued_at: DateTime<Utc>,
) -> CoreResult<Invoice>
where
    C: PaymentConfirmation + ?Sized,
{
    if user.cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    validate_shipping(&request.shipping)?;

    let totals = PricingEngine::new(settings.pricing).compute_cart(user.cart.lines())?;
    let total = totals.total.round_cents();

    if request.amount_paid < total && !confirm.confirm_underpayment(request.amount_paid, total) {
        return Err(CoreError::CheckoutCancelled {
            paid: request.amount_paid.to_string(),
            total: total.to_string(),
        });
    }

    Ok(Invoice {
        company_name: settings.company_name.clone(),
        invoice_number,
        invoice_date: issued_at.date_naive(),
        trn: user.trn.clone(),
        shipping: request.shipping.clone(),
        items: invoice_lines(&totals),
        subtotal: totals.subtotal.round_cents(),
        discount: totals.discount.round_cents(),
        tax: totals.tax.round_cents(),
        total,
        amount_paid: request.amount_paid,
        change_returned: change_returned(request.amount_paid, total),
    })
}

fn invoice_lines(totals: &CartTotals) -> Vec<InvoiceLine> {
    totals
        .lines
        .iter()
        .map(|priced| InvoiceLine {
            name: priced.line.name.clone(),
            qty: priced.line.qty,
            price: priced.line.price,
            discount: priced.calc.discount.round_cents(),
            tax: priced.calc.tax.round_cents(),
            line_total: priced.calc.total.round_cents(),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, CartLine};
    use crate::types::{Gender, Trn};
    use chrono::{NaiveDate, TimeZone};

    fn user_with_cart(lines: Vec<CartLine>) -> User {
        User {
            first_name: "Misty".to_string(),
            last_name: "Waterflower".to_string(),
            dob: NaiveDate::from_ymd_opt(1995, 4, 1).unwrap(),
            gender: Gender::Female,
            phone: "876-555-0100".to_string(),
            email: "misty@example.com".to_string(),
            trn: Trn::parse("123-456-789").unwrap(),
            password: "starmie99".to_string(),
            date_of_registration: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            cart: Cart::from(lines),
            invoices: Vec::new(),
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            full_name: "Misty Waterflower".to_string(),
            email: "misty@example.com".to_string(),
            address: "4 Gym Road".to_string(),
            city: "Cerulean".to_string(),
            zip_code: "JMAAW10".to_string(),
        }
    }

    fn request(paid_cents: i64) -> CheckoutRequest {
        CheckoutRequest {
            shipping: shipping(),
            amount_paid: Money::from_cents(paid_cents),
        }
    }

    fn fifty_times_three() -> Vec<CartLine> {
        vec![CartLine {
            name: "Elite Trainer Box".to_string(),
            price: Money::from_cents(5000),
            qty: 3,
        }]
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 23, 30, 0).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let user = user_with_cart(fifty_times_three());
        let invoice = prepare_invoice(
            &ShopSettings::default(),
            &user,
            &request(16000),
            &Decline,
            "INV-1".to_string(),
            issued_at(),
        )
        .unwrap();

        assert_eq!(invoice.subtotal, Money::from_cents(15000));
        assert_eq!(invoice.discount, Money::from_cents(1500));
        assert_eq!(invoice.tax, Money::from_cents(2025));
        assert_eq!(invoice.total, Money::from_cents(15525));
        assert_eq!(invoice.change_returned, Money::from_cents(475));
        assert_eq!(invoice.company_name, "Cirrus Trading Cards");
        assert_eq!(invoice.trn, user.trn);
        assert_eq!(invoice.invoice_date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].line_total, Money::from_cents(15525));
    }

    #[test]
    fn test_empty_cart_rejected_before_shipping() {
        let user = user_with_cart(Vec::new());
        let bad_request = CheckoutRequest {
            shipping: ShippingInfo::default(),
            amount_paid: Money::zero(),
        };
        let result = prepare_invoice(
            &ShopSettings::default(),
            &user,
            &bad_request,
            &AlwaysProceed,
            "INV-1".to_string(),
            issued_at(),
        );
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_incomplete_shipping_rejected() {
        let user = user_with_cart(fifty_times_three());
        let mut req = request(16000);
        req.shipping.zip_code.clear();

        let result = prepare_invoice(
            &ShopSettings::default(),
            &user,
            &req,
            &AlwaysProceed,
            "INV-1".to_string(),
            issued_at(),
        );
        assert!(matches!(
            result,
            Err(CoreError::IncompleteShipping { field: "zip code" })
        ));
    }

    #[test]
    fn test_underpayment_requires_confirmation() {
        let user = user_with_cart(fifty_times_three());

        let declined = prepare_invoice(
            &ShopSettings::default(),
            &user,
            &request(10000),
            &Decline,
            "INV-1".to_string(),
            issued_at(),
        );
        assert!(matches!(declined, Err(CoreError::CheckoutCancelled { .. })));

        let accepted = prepare_invoice(
            &ShopSettings::default(),
            &user,
            &request(10000),
            &AlwaysProceed,
            "INV-1".to_string(),
            issued_at(),
        )
        .unwrap();
        assert_eq!(accepted.amount_paid, Money::from_cents(10000));
        assert_eq!(accepted.change_returned, Money::zero());
    }

    #[test]
    fn test_confirmation_sees_rounded_total() {
        let user = user_with_cart(fifty_times_three());
        let seen = std::cell::Cell::new(None);
        let confirm = |paid: Money, total: Money| {
            seen.set(Some((paid, total)));
            true
        };

        prepare_invoice(
            &ShopSettings::default(),
            &user,
            &request(0),
            &confirm,
            "INV-1".to_string(),
            issued_at(),
        )
        .unwrap();

        assert_eq!(seen.get(), Some((Money::zero(), Money::from_cents(15525))));
    }

    #[test]
    fn test_exact_payment_skips_confirmation() {
        let user = user_with_cart(fifty_times_three());
        let invoice = prepare_invoice(
            &ShopSettings::default(),
            &user,
            &request(15525),
            &Decline,
            "INV-1".to_string(),
            issued_at(),
        )
        .unwrap();
        assert_eq!(invoice.change_returned, Money::zero());
    }

    #[test]
    fn test_totals_rounded_from_full_precision() {
        // Three lines of 44.99 × 3: each line tax is 18.22095.
        // Rounded per line 18.22 × 3 = 54.66; rounded once 54.66285 → 54.66.
        // Line totals 139.69395 each: per-line 139.69 × 3 = 419.07,
        // rounded once 419.08185 → 419.08.
        let lines = vec![
            CartLine {
                name: "A".to_string(),
                price: Money::from_cents(4499),
                qty: 3,
            },
            CartLine {
                name: "B".to_string(),
                price: Money::from_cents(4499),
                qty: 3,
            },
            CartLine {
                name: "C".to_string(),
                price: Money::from_cents(4499),
                qty: 3,
            },
        ];
        let user = user_with_cart(lines);
        let invoice = prepare_invoice(
            &ShopSettings::default(),
            &user,
            &request(50000),
            &Decline,
            "INV-1".to_string(),
            issued_at(),
        )
        .unwrap();

        let summed_lines: Money = invoice.items.iter().map(|l| l.line_total).sum();
        assert_eq!(summed_lines, Money::from_cents(41907));
        assert_eq!(invoice.total, Money::from_cents(41908));
    }

    #[test]
    fn test_next_invoice_number() {
        assert_eq!(next_invoice_number("INV-", 1_700_000_000_000, []), "INV-1700000000000");

        let existing = ["INV-5000", "INV-4000", "OTHER-9999", "INV-garbage"];
        assert_eq!(next_invoice_number("INV-", 4_500, existing), "INV-5001");
        assert_eq!(next_invoice_number("INV-", 6_000, existing), "INV-6000");
    }

    #[test]
    fn test_change_returned() {
        assert_eq!(
            change_returned(Money::from_cents(16000), Money::from_cents(15525)),
            Money::from_cents(475)
        );
        assert_eq!(
            change_returned(Money::from_cents(100), Money::from_cents(15525)),
            Money::zero()
        );
    }
}
