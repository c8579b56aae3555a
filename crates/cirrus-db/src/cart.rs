//! # Cart Service
//!
//! Applies cart transformations to the logged-in user and saves the result.
//!
//! Every mutation is one read-modify-write of the session user:
//! `session.require()` → `Cart` transform → `session.save()`. A failed
//! transform (bad index) writes nothing.

use tracing::debug;

use cirrus_core::{Cart, CartTotals, CoreResult, PricingEngine, PricingRules, User};

use crate::error::DbResult;
use crate::repository::product::ProductRepository;
use crate::repository::session::SessionRepository;
use crate::store::KeyValueStore;

/// Cart operations for the logged-in user.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
    engine: PricingEngine,
}

impl<S: KeyValueStore> CartService<S> {
    pub fn new(store: S, rules: PricingRules) -> Self {
        CartService {
            store,
            engine: PricingEngine::new(rules),
        }
    }

    fn session(&self) -> SessionRepository<S> {
        SessionRepository::new(self.store.clone())
    }

    /// Runs `change` on the session user's cart and saves the new cart.
    async fn mutate<F>(&self, change: F) -> DbResult<Cart>
    where
        F: FnOnce(&Cart) -> CoreResult<Cart>,
    {
        let session = self.session();
        let mut user: User = session.require().await?;

        user.cart = change(&user.cart)?;
        session.save(&user).await?;

        debug!(trn = %user.trn, lines = user.cart.len(), items = user.cart.item_count(), "Cart saved");
        Ok(user.cart)
    }

    /// The current cart with its priced lines and totals.
    pub async fn view(&self) -> DbResult<(Cart, CartTotals)> {
        let user = self.session().require().await?;
        let totals = self.engine.compute_cart(user.cart.lines())?;
        Ok((user.cart, totals))
    }

    /// Adds one unit of the product with `product_id`.
    ///
    /// ## Errors
    /// `ProductNotFound` for an unknown id; `NotLoggedIn` without a session.
    pub async fn add(&self, product_id: &str) -> DbResult<Cart> {
        let product = ProductRepository::new(self.store.clone())
            .get_by_id(product_id)
            .await?;
        self.mutate(|cart| Ok(cart.add_or_increment(&product))).await
    }

    /// Sets the quantity of line `index` (0-based); values below 1 become 1.
    pub async fn set_quantity(&self, index: usize, qty: i64) -> DbResult<Cart> {
        self.mutate(|cart| cart.set_quantity(index, qty)).await
    }

    /// Removes line `index` (0-based).
    pub async fn remove(&self, index: usize) -> DbResult<Cart> {
        self.mutate(|cart| cart.remove_at(index)).await
    }

    /// Empties the cart.
    pub async fn clear(&self) -> DbResult<Cart> {
        self.mutate(|_| Ok(Cart::new())).await
    }

    /// Total quantity in the cart; zero when nobody is logged in.
    pub async fn item_count(&self) -> DbResult<i64> {
        Ok(self
            .session()
            .current()
            .await?
            .map_or(0, |user| user.cart.item_count()))
    }
}
