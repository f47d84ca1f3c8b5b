//! # Key-Value Storage Port
//!
//! The alarm store only needs "read a string by key" and "write a string by
//! key". This trait is that seam, so the store runs the same way against
//! SQLite ([`crate::SqliteKvStore`]) and against memory ([`MemoryKvStore`]).
//!
//! ```text
//!          AlarmStore
//!              │
//!              ▼
//!   ┌──────────────────────┐
//!   │  dyn KeyValueStore   │
//!   └──────────┬───────────┘
//!        ┌─────┴──────┐
//!        ▼            ▼
//!  SqliteKvStore  MemoryKvStore
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreResult;

/// Durable string storage keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`, `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Absent keys are not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-process key-value store.
///
/// Nothing survives the process. Used by tests and as a scratch store.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryKvStore {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
