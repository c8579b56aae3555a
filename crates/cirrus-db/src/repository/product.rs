//! # Product Repository
//!
//! Read access to the catalog, materialized from the seed on first use.
//!
//! ## Lazy Seeding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  all()                                                                  │
//! │    │                                                                    │
//! │    ├── "AllProducts" absent ─────────┐                                 │
//! │    ├── present but empty [] ─────────┼──► write seed_products()        │
//! │    ├── present but not valid JSON ───┘    (warn on corrupt)            │
//! │    │                                                                    │
//! │    └── present, non-empty ──────────────► stored copy wins             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use cirrus_core::catalog::{self, CategoryFilter};
use cirrus_core::{CoreError, Product};

use crate::error::{DbError, DbResult};
use crate::repository::{keys, read_json};
use crate::store::KeyValueStore;

/// Repository for catalog reads.
#[derive(Debug, Clone)]
pub struct ProductRepository<S> {
    store: S,
}

impl<S: KeyValueStore> ProductRepository<S> {
    /// Creates a new ProductRepository.
    pub fn new(store: S) -> Self {
        ProductRepository { store }
    }

    /// Returns the whole catalog, seeding it first if needed.
    pub async fn all(&self) -> DbResult<Vec<Product>> {
        match read_json::<S, Vec<Product>>(&self.store, keys::CATALOG).await {
            Ok(Some(products)) if !products.is_empty() => return Ok(products),
            Ok(_) => {}
            Err(DbError::CorruptRecord { source, .. }) => {
                warn!(error = %source, "Stored catalog is corrupt; re-seeding");
            }
            Err(e) => return Err(e),
        }

        let seed = catalog::seed_products();
        let json = serde_json::to_string(&seed).map_err(|e| DbError::corrupt(keys::CATALOG, e))?;
        self.store.set(keys::CATALOG, json).await?;

        info!(count = seed.len(), "Seeded product catalog");
        Ok(seed)
    }

    /// Gets a product by id.
    ///
    /// ## Errors
    /// `ProductNotFound` when no product has this id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        let products = self.all().await?;
        catalog::find_by_id(&products, id)
            .cloned()
            .ok_or_else(|| DbError::Core(CoreError::ProductNotFound(id.to_string())))
    }

    /// Searches by name/description with an optional category filter.
    pub async fn search(&self, term: &str, category: CategoryFilter) -> DbResult<Vec<Product>> {
        debug!(term = %term, category = ?category, "Searching products");

        let products = self.all().await?;
        Ok(catalog::search(&products, term, category)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use cirrus_core::{Category, Money};

    #[tokio::test]
    async fn test_first_read_seeds_catalog() {
        let store = MemoryStore::new();
        let repo = ProductRepository::new(store.clone());

        let products = repo.all().await.unwrap();
        assert_eq!(products.len(), 17);
        assert!(store.get(keys::CATALOG).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stored_catalog_wins() {
        let store = MemoryStore::new();
        let custom = vec![Product {
            id: "x1".to_string(),
            name: "Custom".to_string(),
            price: Money::from_cents(100),
            image: String::new(),
            category: Category::Special,
            description: String::new(),
        }];
        store
            .set(keys::CATALOG, serde_json::to_string(&custom).unwrap())
            .await
            .unwrap();

        let repo = ProductRepository::new(store);
        assert_eq!(repo.all().await.unwrap(), custom);
    }

    #[tokio::test]
    async fn test_empty_or_corrupt_catalog_is_reseeded() {
        for raw in ["[]", "{not json"] {
            let store = MemoryStore::new();
            store.set(keys::CATALOG, raw.to_string()).await.unwrap();

            let repo = ProductRepository::new(store);
            assert_eq!(repo.all().await.unwrap().len(), 17, "stored: {}", raw);
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = ProductRepository::new(MemoryStore::new());
        let bundle = repo.get_by_id("p15").await.unwrap();
        assert_eq!(bundle.price, Money::from_cents(4499));

        let err = repo.get_by_id("p404").await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ProductNotFound(id)) if id == "p404"));
    }

    #[tokio::test]
    async fn test_search() {
        let repo = ProductRepository::new(MemoryStore::new());
        let hits = repo.search("elite trainer", Some(Category::TrainerBox)).await.unwrap();
        assert_eq!(hits.len(), 5);
        assert!(repo.search("zzz", None).await.unwrap().is_empty());
    }
}
