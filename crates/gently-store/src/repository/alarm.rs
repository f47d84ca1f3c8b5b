//! # Alarm Store
//!
//! The ordered list of alarms, kept in memory and mirrored to a
//! [`KeyValueStore`] under the `"alarms"` key.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AlarmStore Lifecycle                            │
//! │                                                                         │
//! │  AlarmStore::open(kv)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load_from_storage ── missing / unreadable / malformed ──▶ []  (warn)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────┐                                       │
//! │  │  Vec<Alarm> (authoritative)  │◀── add / delete / set_enabled /      │
//! │  └──────────────┬───────────────┘    set_time                          │
//! │                 │                                                       │
//! │                 ▼ after every change                                    │
//! │  kv.set("alarms", "[{...},{...}]")                                     │
//! │                 │                                                       │
//! │                 └── failure → StoreError, memory keeps the change       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Insertion order is preserved and is the order alarms are transmitted to
//! the peripheral. Edits replace a record in place.

use std::sync::Arc;

use gently_core::validation::validate_unique_ids;
use gently_core::{next_available_id, Alarm, AlarmId, AlarmTime, ALARMS_STORAGE_KEY};
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Ordered alarm collection with durable persistence.
pub struct AlarmStore {
    kv: Arc<dyn KeyValueStore>,
    alarms: Vec<Alarm>,
}

impl std::fmt::Debug for AlarmStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmStore")
            .field("alarms", &self.alarms)
            .finish_non_exhaustive()
    }
}

impl AlarmStore {
    /// Opens a store over `kv`, hydrating it from storage.
    pub async fn open<K>(kv: K) -> Self
    where
        K: KeyValueStore + 'static,
    {
        Self::open_shared(Arc::new(kv)).await
    }

    /// Opens a store over a shared key-value handle.
    pub async fn open_shared(kv: Arc<dyn KeyValueStore>) -> Self {
        let alarms = Self::load_from_storage(kv.as_ref()).await;
        info!(count = alarms.len(), "Alarm store loaded");
        AlarmStore { kv, alarms }
    }

    /// Reads the persisted alarm list.
    ///
    /// ## Fail-Soft
    /// Never errors. Each of these yields an empty list and a warning:
    /// - storage read error
    /// - value is not JSON, or not a JSON array
    /// - a record has an invalid id or time
    /// - two records share an id
    ///
    /// A missing key is the normal first-run state and yields an empty list
    /// without a warning.
    pub async fn load_from_storage(kv: &dyn KeyValueStore) -> Vec<Alarm> {
        let raw = match kv.get(ALARMS_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored alarms, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored alarms, starting empty");
                return Vec::new();
            }
        };

        let alarms: Vec<Alarm> = match serde_json::from_str(&raw) {
            Ok(alarms) => alarms,
            Err(e) => {
                warn!(error = %e, "Stored alarms are malformed, starting empty");
                return Vec::new();
            }
        };

        if let Err(e) = validate_unique_ids(&alarms) {
            warn!(error = %e, "Stored alarms are malformed, starting empty");
            return Vec::new();
        }

        alarms
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Read-only view of the alarms in insertion order.
    pub fn list(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Id the next [`add`](Self::add) will use.
    pub fn next_id(&self) -> StoreResult<AlarmId> {
        Ok(next_available_id(self.alarms.iter().map(|a| a.id))?)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends a new alarm with the smallest free id.
    pub async fn add(&mut self, time: AlarmTime, enabled: bool) -> StoreResult<Alarm> {
        let alarm = Alarm::new(self.next_id()?, time, enabled);
        self.alarms.push(alarm.clone());

        info!(alarm_id = %alarm.id, time = %alarm.time, enabled, "Alarm added");

        self.persist().await?;
        Ok(alarm)
    }

    /// Removes the alarm with `id`.
    ///
    /// Returns `false` (and writes nothing) when no such alarm exists.
    pub async fn delete(&mut self, id: AlarmId) -> StoreResult<bool> {
        let before = self.alarms.len();
        self.alarms.retain(|a| a.id != id);
        if self.alarms.len() == before {
            debug!(alarm_id = %id, "Delete of unknown alarm ignored");
            return Ok(false);
        }

        info!(alarm_id = %id, "Alarm deleted");

        self.persist().await?;
        Ok(true)
    }

    /// Turns the alarm with `id` on or off, keeping its position.
    ///
    /// Returns `false` (and writes nothing) when no such alarm exists.
    pub async fn set_enabled(&mut self, id: AlarmId, enabled: bool) -> StoreResult<bool> {
        let Some(slot) = self.alarms.iter_mut().find(|a| a.id == id) else {
            debug!(alarm_id = %id, "Toggle of unknown alarm ignored");
            return Ok(false);
        };
        *slot = slot.with_enabled(enabled);

        info!(alarm_id = %id, enabled, "Alarm toggled");

        self.persist().await?;
        Ok(true)
    }

    /// Moves the alarm with `id` to a new time, keeping its id and position.
    ///
    /// Returns `false` (and writes nothing) when no such alarm exists.
    pub async fn set_time(&mut self, id: AlarmId, time: AlarmTime) -> StoreResult<bool> {
        let Some(slot) = self.alarms.iter_mut().find(|a| a.id == id) else {
            debug!(alarm_id = %id, "Edit of unknown alarm ignored");
            return Ok(false);
        };
        *slot = slot.with_time(time);

        info!(alarm_id = %id, time = %time, "Alarm time changed");

        self.persist().await?;
        Ok(true)
    }

    /// Writes the full list under the alarms key.
    async fn persist(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.alarms)?;
        if let Err(e) = self.kv.set(ALARMS_STORAGE_KEY, &json).await {
            warn!(error = %e, "Failed to persist alarms, in-memory list kept");
            return Err(e);
        }
        debug!(count = self.alarms.len(), "Alarms persisted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
