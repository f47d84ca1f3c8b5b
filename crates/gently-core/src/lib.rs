//! # gently-core: Pure Alarm Model for Gently Alarms
//!
//! This crate holds everything about an alarm that does not touch the
//! outside world: the record itself, how it is written on the wire for the
//! Gently peripheral, and how ids are handed out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Gently Alarms Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    gently CLI (apps/gently-cli)                 │   │
//! │  │       list / add / delete / enable / disable / push / forget    │   │
//! │  └───────────────┬───────────────────────────────┬─────────────────┘   │
//! │                  │                               │                      │
//! │  ┌───────────────▼───────────────┐ ┌─────────────▼─────────────────┐   │
//! │  │  gently-store                 │ │  gently-sync                  │   │
//! │  │  AlarmStore + SQLite KV       │ │  SyncEngine + DeviceLink      │   │
//! │  └───────────────┬───────────────┘ └─────────────┬─────────────────┘   │
//! │                  │                               │                      │
//! │  ┌───────────────▼───────────────────────────────▼─────────────────┐   │
//! │  │               ★ gently-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   wire    │  │    ids    │  │ validation│  │   │
//! │  │   │   Alarm   │  │  upsert   │  │ smallest  │  │  HH:MM:SS │  │   │
//! │  │   │ AlarmTime │  │  delete   │  │   free id │  │  ids > 0  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO BLUETOOTH • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (`Alarm`, `AlarmId`, `AlarmTime`)
//! - [`wire`] - Byte payloads the peripheral firmware expects
//! - [`ids`] - Smallest-free-id allocation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use gently_core::{wire, Alarm, AlarmId};
//!
//! let alarm = Alarm::new(AlarmId::new(1).unwrap(), "07:00:00".parse().unwrap(), true);
//!
//! // "1,07:00:00,1" → base64 → bytes
//! assert_eq!(wire::encode_upsert(&alarm), b"MSwwNzowMDowMCwx".to_vec());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ids;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ids::next_available_id;
pub use types::{Alarm, AlarmId, AlarmTime};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Advertised name of the peripheral the alarms are synchronized to.
///
/// The peripheral is identified by name only; there is no pairing step.
pub const DEVICE_NAME: &str = "GentlyDevice";

/// GATT service exposing the alarm characteristics.
pub const ALARM_SERVICE_UUID: &str = "12345678-1234-5678-1234-56789abcdef0";

/// Characteristic receiving create/update payloads ([`wire::encode_upsert`]).
pub const UPSERT_CHARACTERISTIC_UUID: &str = "12345678-1234-5678-1234-56789abcdef1";

/// Characteristic receiving delete payloads ([`wire::encode_delete`]).
pub const DELETE_CHARACTERISTIC_UUID: &str = "12345678-1234-5678-1234-56789abcdef2";

/// Key under which the alarm list is persisted as a JSON array.
pub const ALARMS_STORAGE_KEY: &str = "alarms";
