//! # Invoice Repository
//!
//! Read side of the global ledger (`AllInvoices`) and the last-invoice slot
//! (`lastInvoice`). Invoices are written only by the `OrderLedger`.

use cirrus_core::Invoice;

use crate::error::DbResult;
use crate::repository::{keys, read_json, read_list};
use crate::store::KeyValueStore;

/// Repository for ledger reads.
#[derive(Debug, Clone)]
pub struct InvoiceRepository<S> {
    store: S,
}

impl<S: KeyValueStore> InvoiceRepository<S> {
    /// Creates a new InvoiceRepository.
    pub fn new(store: S) -> Self {
        InvoiceRepository { store }
    }

    /// Every committed invoice, oldest first.
    pub async fn all(&self) -> DbResult<Vec<Invoice>> {
        read_list(&self.store, keys::LEDGER).await
    }

    /// The last-invoice slot, falling back to the newest ledger entry.
    pub async fn last(&self) -> DbResult<Option<Invoice>> {
        if let Some(invoice) = read_json(&self.store, keys::LAST_INVOICE).await? {
            return Ok(Some(invoice));
        }
        Ok(self.all().await?.pop())
    }

    /// Ledger entries whose issuer TRN matches exactly.
    pub async fn find_by_issuer(&self, trn: &str) -> DbResult<Vec<Invoice>> {
        let trn = trn.trim();
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|inv| inv.trn.as_str() == trn)
            .collect())
    }

    /// Invoice numbers already in the ledger.
    pub async fn invoice_numbers(&self) -> DbResult<Vec<String>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .map(|inv| inv.invoice_number)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::sample_invoice;

    #[tokio::test]
    async fn test_empty_ledger() {
        let repo = InvoiceRepository::new(MemoryStore::new());
        assert!(repo.all().await.unwrap().is_empty());
        assert!(repo.last().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_falls_back_to_ledger() {
        let store = MemoryStore::new();
        let ledger = vec![
            sample_invoice("INV-1", "111-222-333"),
            sample_invoice("INV-2", "444-555-666"),
        ];
        store
            .set(keys::LEDGER, serde_json::to_string(&ledger).unwrap())
            .await
            .unwrap();

        let repo = InvoiceRepository::new(store.clone());
        assert_eq!(repo.last().await.unwrap().unwrap().invoice_number, "INV-2");

        let pinned = sample_invoice("INV-1", "111-222-333");
        store
            .set(keys::LAST_INVOICE, serde_json::to_string(&pinned).unwrap())
            .await
            .unwrap();
        assert_eq!(repo.last().await.unwrap().unwrap(), pinned);
    }

    #[tokio::test]
    async fn test_find_by_issuer() {
        let store = MemoryStore::new();
        let ledger = vec![
            sample_invoice("INV-1", "111-222-333"),
            sample_invoice("INV-2", "444-555-666"),
            sample_invoice("INV-3", "111-222-333"),
        ];
        store
            .set(keys::LEDGER, serde_json::to_string(&ledger).unwrap())
            .await
            .unwrap();

        let repo = InvoiceRepository::new(store);
        let mine = repo.find_by_issuer("111-222-333").await.unwrap();
        let numbers: Vec<&str> = mine.iter().map(|i| i.invoice_number.as_str()).collect();
        assert_eq!(numbers, vec!["INV-1", "INV-3"]);
        assert!(repo.find_by_issuer("000-000-000").await.unwrap().is_empty());
        assert_eq!(
            repo.invoice_numbers().await.unwrap(),
            vec!["INV-1", "INV-2", "INV-3"]
        );
    }
}
