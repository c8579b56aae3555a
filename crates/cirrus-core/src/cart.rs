//! # Cart
//!
//! The active cart of a user and the transformations applied to it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller Action            Operation                  New Cart           │
//! │  ─────────────            ─────────                  ────────           │
//! │                                                                         │
//! │  Add to Cart ───────────► add_or_increment() ──────► qty += 1 or push  │
//! │  Change Quantity ───────► set_quantity() ──────────► lines[i].qty = n  │
//! │  Click Remove ──────────► remove_at() ─────────────► lines.remove(i)   │
//! │  Clear / Checkout ──────► Cart::default() ─────────► []                │
//! │                                                                         │
//! │  Every operation returns a NEW cart; on error the old one is untouched. │
//! │  Writing the new cart back into the user record is the caller's job.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are merged by product **name**, not id: two products that share a
//! display name collapse into one line.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

/// Largest quantity a single line can hold.
pub const MAX_LINE_QTY: i64 = 9_999;

/// One line of a cart.
///
/// ## Invariants
/// - `1 <= qty <= MAX_LINE_QTY`
/// - `price` is a snapshot taken when the product was first added
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product name; the de-duplication key.
    pub name: String,

    /// Unit price frozen at add time.
    pub price: Money,

    pub qty: i64,
}

impl CartLine {
    /// Starts a line for a product with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            name: product.name.clone(),
            price: product.price,
            qty: 1,
        }
    }
}

/// An ordered list of cart lines. Serializes as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Returns the lines in display order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Adds one unit of `product`.
    ///
    /// If a line with the same name exists its quantity goes up by one and
    /// its original price is kept (a line already at [`MAX_LINE_QTY`] stays
    /// there); otherwise a new line is appended.
    pub fn add_or_increment(&self, product: &Product) -> Cart {
        let mut next = self.clone();
        match next.lines.iter_mut().find(|l| l.name == product.name) {
            Some(line) => line.qty = line.qty.saturating_add(1).clamp(1, MAX_LINE_QTY),
            None => next.lines.push(CartLine::from_product(product)),
        }
        next
    }

    /// Sets the quantity of the line at `index`.
    ///
    /// Values are coerced into `1..=MAX_LINE_QTY`, never rejected.
    pub fn set_quantity(&self, index: usize, new_qty: i64) -> CoreResult<Cart> {
        let mut next = self.clone();
        let len = next.lines.len();
        let line = next
            .lines
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;
        line.qty = new_qty.clamp(1, MAX_LINE_QTY);
        Ok(next)
    }

    /// Removes the line at `index`, keeping the order of the rest.
    pub fn remove_at(&self, index: usize) -> CoreResult<Cart> {
        if index >= self.lines.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }

        let mut next = self.clone();
        next.lines.remove(index);
        Ok(next)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines (the cart badge count).
    pub fn item_count(&self) -> i64 {
        self.lines
            .iter()
            .fold(0_i64, |count, l| count.saturating_add(l.qty))
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Cart { lines }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::from_cents(cents),
            image: format!("Assets/{}.jpg", id),
            category: Category::Booster,
            description: String::new(),
        }
    }

    #[test]
    fn test_add_to_empty_cart() {
        let bundle = product("p15", "Booster Bundle", 4499);
        let cart = Cart::new().add_or_increment(&bundle);

        assert_eq!(
            cart.lines(),
            &[CartLine {
                name: "Booster Bundle".to_string(),
                price: Money::from_cents(4499),
                qty: 1,
            }]
        );
    }

    #[test]
    fn test_add_same_name_increments() {
        let bundle = product("p15", "Booster Bundle", 4499);
        let cart = Cart::new()
            .add_or_increment(&bundle)
            .add_or_increment(&bundle);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].qty, 2);
    }

    #[test]
    fn test_distinct_ids_with_same_name_merge() {
        let a = product("p1", "Mystery Box", 1000);
        let b = product("p2", "Mystery Box", 2500);
        let cart = Cart::new().add_or_increment(&a).add_or_increment(&b);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].qty, 2);
        // The first snapshot price wins.
        assert_eq!(cart.lines()[0].price, Money::from_cents(1000));
    }

    #[test]
    fn test_add_does_not_mutate_original() {
        let original = Cart::new();
        let _ = original.add_or_increment(&product("p1", "Box", 100));
        assert!(original.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let cart = Cart::new().add_or_increment(&product("p1", "Box", 100));

        let cart = cart.set_quantity(0, 5).unwrap();
        assert_eq!(cart.lines()[0].qty, 5);

        let cart = cart.set_quantity(0, 0).unwrap();
        assert_eq!(cart.lines()[0].qty, 1);

        let cart = cart.set_quantity(0, -4).unwrap();
        assert_eq!(cart.lines()[0].qty, 1);
    }

    #[test]
    fn test_huge_quantity_is_capped() {
        let bundle = product("p15", "Booster Bundle", 4499);
        let cart = Cart::new()
            .add_or_increment(&bundle)
            .set_quantity(0, i64::MAX)
            .unwrap();
        assert_eq!(cart.lines()[0].qty, MAX_LINE_QTY);

        let cart = cart.add_or_increment(&bundle);
        assert_eq!(cart.lines()[0].qty, MAX_LINE_QTY);
        assert_eq!(cart.item_count(), MAX_LINE_QTY);
    }

    #[test]
    fn test_item_count_saturates_on_stored_quantities() {
        let cart = Cart::from(vec![
            CartLine {
                name: "A".to_string(),
                price: Money::from_cents(100),
                qty: i64::MAX,
            },
            CartLine {
                name: "B".to_string(),
                price: Money::from_cents(100),
                qty: 5,
            },
        ]);
        assert_eq!(cart.item_count(), i64::MAX);
    }

    #[test]
    fn test_out_of_range_leaves_cart_unchanged() {
        let cart = Cart::new().add_or_increment(&product("p1", "Box", 100));
        let before = cart.clone();

        assert!(matches!(
            cart.set_quantity(3, 2),
            Err(CoreError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(
            cart.remove_at(1),
            Err(CoreError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_preserves_order() {
        let cart = Cart::new()
            .add_or_increment(&product("p1", "A", 100))
            .add_or_increment(&product("p2", "B", 100))
            .add_or_increment(&product("p3", "C", 100));

        let cart = cart.remove_at(1).unwrap();
        let names: Vec<&str> = cart.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let cart = Cart::new()
            .add_or_increment(&product("p1", "A", 100))
            .add_or_increment(&product("p1", "A", 100))
            .add_or_increment(&product("p2", "B", 100));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(Cart::new().item_count(), 0);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::new().add_or_increment(&product("p1", "Box", 4499));
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "Box");
        assert_eq!(json[0]["qty"], 1);
    }
}
