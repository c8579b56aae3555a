//! # Key-Value Store
//!
//! The repository interface every piece of persisted state goes through.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       KeyValueStore                                     │
//! │                                                                         │
//! │  get(key)        ──► Some(json) | None                                 │
//! │  set(key, json)  ──► overwrite one key                                 │
//! │  remove(key)     ──► delete one key (absent is fine)                   │
//! │  set_many(batch) ──► ALL writes land, or NONE do                       │
//! │                                                                         │
//! │  Implementations:                                                       │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │     MemoryStore      │        │     SqliteStore      │              │
//! │  │  Mutex<HashMap>      │        │  kv_store table      │              │
//! │  │  (tests, demos)      │        │  (pool.rs)           │              │
//! │  └──────────────────────┘        └──────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque strings here; the repositories encode them as JSON.

use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{DbError, DbResult};

// =============================================================================
// Batches
// =============================================================================

/// One pending write in a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreWrite {
    pub fn key(&self) -> &str {
        match self {
            StoreWrite::Set { key, .. } | StoreWrite::Remove { key } => key,
        }
    }
}

/// Writes applied together by [`KeyValueStore::set_many`].
///
/// Later writes to the same key win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<StoreWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch::default()
    }

    /// Queues `value` encoded as JSON under `key`.
    pub fn put_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> DbResult<&mut Self> {
        let json = serde_json::to_string(value).map_err(|e| DbError::corrupt(key, e))?;
        self.writes.push(StoreWrite::Set {
            key: key.to_string(),
            value: json,
        });
        Ok(self)
    }

    /// Queues removal of `key`.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.writes.push(StoreWrite::Remove {
            key: key.to_string(),
        });
        self
    }

    pub fn writes(&self) -> &[StoreWrite] {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Keys touched, in write order.
    pub fn keys(&self) -> Vec<&str> {
        self.writes.iter().map(StoreWrite::key).collect()
    }

    pub fn into_writes(self) -> Vec<StoreWrite> {
        self.writes
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Persistent string storage keyed by name.
///
/// Handles are cheap to clone and share one underlying store.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    /// Reads the value under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = DbResult<Option<String>>> + Send;

    /// Overwrites the value under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = DbResult<()>> + Send;

    /// Deletes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = DbResult<()>> + Send;

    /// Applies every write in `batch`, or none of them.
    fn set_many(&self, batch: WriteBatch) -> impl Future<Output = DbResult<()>> + Send;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// A [`KeyValueStore`] backed by a map in memory.
///
/// Used as the test fake. It can be switched "offline" so callers can
/// exercise the storage-unavailable path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes every following operation fail with `StorageUnavailable`
    /// (or succeed again when `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    fn check_available(&self) -> DbResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::StorageUnavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.check_available()?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> DbResult<()> {
        self.check_available()?;
        debug!(key = %key, bytes = value.len(), "Writing key");
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.check_available()?;
        debug!(key = %key, "Removing key");
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn set_many(&self, batch: WriteBatch) -> DbResult<()> {
        self.check_available()?;
        debug!(keys = ?batch.keys(), "Writing batch");

        // One lock for the whole batch: nobody observes it half-applied.
        let mut entries = self.entries.lock().await;
        for write in batch.into_writes() {
            match write {
                StoreWrite::Set { key, value } => {
                    entries.insert(key, value);
                }
                StoreWrite::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
