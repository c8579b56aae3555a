//! # Order Ledger
//!
//! The only place invoices are created and written.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit(user, {shipping, amount_paid}, confirm)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prepare_invoice()  (cirrus-core: preconditions, pricing, rounding)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────── ONE set_many BATCH ────────────────────────┐ │
//! │  │  1. stored.invoices += invoice ┐   RegistrationData, plus          │ │
//! │  │     stored.cart = []           ├─► loggedInUser only when it       │ │
//! │  │                                ┘   already holds this TRN          │ │
//! │  │  2. AllInvoices += invoice                                         │ │
//! │  │  3. lastInvoice  = invoice                                         │ │
//! │  └────────────────────────────────────────────────────────────────────┘ │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  All four effects land together, or the invoice does not exist.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads of the ledger (`get_last`, `find_by_issuer`) are plain scans.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use cirrus_core::invoice::{next_invoice_number, prepare_invoice};
use cirrus_core::{Cart, CheckoutRequest, Invoice, PaymentConfirmation, ShopSettings, User};

use crate::error::DbResult;
use crate::repository::invoice::InvoiceRepository;
use crate::repository::keys;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::store::{KeyValueStore, WriteBatch};

/// Converts carts into invoices and keeps the three invoice copies in step.
#[derive(Debug, Clone)]
pub struct OrderLedger<S> {
    store: S,
    settings: ShopSettings,
}

impl<S: KeyValueStore> OrderLedger<S> {
    pub fn new(store: S, settings: ShopSettings) -> Self {
        OrderLedger { store, settings }
    }

    fn invoices(&self) -> InvoiceRepository<S> {
        InvoiceRepository::new(self.store.clone())
    }

    /// Checks out `user`'s cart at the current time.
    ///
    /// See [`commit_at`](Self::commit_at).
    pub async fn commit<C>(
        &self,
        user: &User,
        request: &CheckoutRequest,
        confirm: &C,
    ) -> DbResult<Invoice>
    where
        C: PaymentConfirmation + Sync + ?Sized,
    {
        self.commit_at(user, request, confirm, Utc::now()).await
    }

    /// Checks out `user`'s cart as of `issued_at`.
    ///
    /// ## Errors
    /// - `EmptyCart`, `IncompleteShipping`, `CheckoutCancelled` from the
    ///   invoice rules; nothing is written
    /// - Storage errors from the batch write; nothing is written
    pub async fn commit_at<C>(
        &self,
        user: &User,
        request: &CheckoutRequest,
        confirm: &C,
        issued_at: DateTime<Utc>,
    ) -> DbResult<Invoice>
    where
        C: PaymentConfirmation + Sync + ?Sized,
    {
        let mut ledger = self.invoices().all().await?;

        let number = next_invoice_number(
            &self.settings.invoice_prefix,
            issued_at.timestamp_millis(),
            ledger.iter().map(|inv| inv.invoice_number.as_str()),
        );
        let invoice = prepare_invoice(&self.settings, user, request, confirm, number, issued_at)?;

        // The stored record, not the caller's copy, carries the history.
        let users = UserRepository::new(self.store.clone());
        let in_session = SessionRepository::new(self.store.clone())
            .current()
            .await?
            .filter(|current| current.trn == user.trn);
        let logged_in = in_session.is_some();
        let mut buyer = match in_session {
            Some(stored) => stored,
            None => users
                .find_by_trn(user.trn.as_str())
                .await?
                .unwrap_or_else(|| user.clone()),
        };
        buyer.invoices.push(invoice.clone());
        buyer.cart = Cart::new();
        ledger.push(invoice.clone());

        let mut batch = WriteBatch::new();
        if logged_in {
            batch.put_json(keys::SESSION, &buyer)?;
        }
        if !users.stage_update(&buyer, &mut batch).await? {
            warn!(trn = %buyer.trn, logged_in, "Buyer missing from registry");
        }
        batch
            .put_json(keys::LEDGER, &ledger)?
            .put_json(keys::LAST_INVOICE, &invoice)?;

        debug!(keys = ?batch.keys(), "Committing invoice batch");
        self.store.set_many(batch).await?;

        info!(
            invoice_number = %invoice.invoice_number,
            trn = %invoice.trn,
            total = %invoice.total,
            lines = invoice.items.len(),
            "Invoice committed"
        );
        Ok(invoice)
    }

    /// The most recent invoice: the last-invoice slot, else the newest
    /// ledger entry, else none.
    pub async fn get_last(&self) -> DbResult<Option<Invoice>> {
        self.invoices().last().await
    }

    /// Ledger entries issued under `trn`.
    pub async fn find_by_issuer(&self, trn: &str) -> DbResult<Vec<Invoice>> {
        self.invoices().find_by_issuer(trn).await
    }

    /// A registered user's own invoice history.
    ///
    /// ## Errors
    /// `UserNotFound` when `trn` is not registered.
    pub async fn user_history(&self, trn: &str) -> DbResult<Vec<Invoice>> {
        let user = UserRepository::new(self.store.clone()).get_by_trn(trn).await?;
        Ok(user.invoices)
    }

    /// Every invoice in the global ledger.
    pub async fn all(&self) -> DbResult<Vec<Invoice>> {
        self.invoices().all().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
