//! # Device Link
//!
//! The Bluetooth LE capabilities the engine consumes.
//!
//! ## Call Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Engine ↔ DeviceLink                                  │
//! │                                                                         │
//! │   SyncEngine                          DeviceLink                        │
//! │   ──────────                          ──────────                        │
//! │   events()  ─────────────────────────▶ Receiver<LinkEvent> (once)       │
//! │   scan(filter, 5s) ──────────────────▶ starts scanning, returns         │
//! │                     ◀───────────────── LinkEvent::ScanStopped           │
//! │   discovered() ──────────────────────▶ [PeripheralDescriptor]           │
//! │   connect(id) ───────────────────────▶ Ok / LinkError                   │
//! │   discover_services(id) ─────────────▶ [GattCharacteristic]             │
//! │   write_characteristic(id, s, c, b) ─▶ Ok / LinkError                   │
//! │   disconnect(id) ────────────────────▶ best effort                      │
//! │                                                                         │
//! │                     ◀───────────────── LinkEvent::Disconnected (any     │
//! │                                        time, unsolicited)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Completion of a scan is signalled by an event, not by `scan` returning.
//! Everything asynchronous the link wants to tell the engine goes through
//! the one event channel.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

// =============================================================================
// Identifiers & Descriptors
// =============================================================================

/// Opaque peripheral identifier assigned by the platform.
///
/// A MAC address on Linux/Android, a UUID on Apple platforms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeripheralId(String);

impl PeripheralId {
    pub fn new(id: impl Into<String>) -> Self {
        PeripheralId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeripheralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A peripheral seen during the last scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralDescriptor {
    pub id: PeripheralId,
    /// Advertised local name, if the peripheral sent one.
    pub name: Option<String>,
}

/// One characteristic exposed by a connected peripheral.
///
/// UUIDs compare by value, so `ABCDEF..` and `abcdef..` are the same
/// characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GattCharacteristic {
    pub service: Uuid,
    pub characteristic: Uuid,
}

/// Optional restriction of a scan.
///
/// An empty service list scans for everything. The Gently peripheral does
/// not always advertise its service, so the engine scans unfiltered and
/// matches on name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    pub services: Vec<Uuid>,
}

// =============================================================================
// Events
// =============================================================================

/// Something the link reports on its own schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The scan started by [`DeviceLink::scan`] has ended.
    ScanStopped,

    /// A peripheral dropped its connection.
    Disconnected { peripheral_id: PeripheralId },
}

// =============================================================================
// Errors
// =============================================================================

/// Failure reported by a link operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Platform-specific failure, with its message.
    #[error("{0}")]
    Message(String),

    /// The operation needs a connection to the peripheral.
    #[error("Peripheral is not connected")]
    NotConnected,

    /// No usable Bluetooth adapter.
    #[error("Bluetooth is unavailable")]
    Unavailable,
}

pub type LinkResult<T> = Result<T, LinkError>;

// =============================================================================
// DeviceLink Trait
// =============================================================================

/// Bluetooth LE central capabilities used by the sync engine.
#[async_trait]
pub trait DeviceLink: Send + Sync {
    /// Hands out the event receiver. Returns `None` after the first call.
    fn events(&self) -> Option<mpsc::Receiver<LinkEvent>>;

    /// Starts scanning for `duration`. Completion arrives as
    /// [`LinkEvent::ScanStopped`].
    async fn scan(&self, filter: &ScanFilter, duration: Duration) -> LinkResult<()>;

    /// Peripherals seen so far.
    async fn discovered(&self) -> LinkResult<Vec<PeripheralDescriptor>>;

    async fn connect(&self, id: &PeripheralId) -> LinkResult<()>;

    /// Best effort. Callers log and ignore the result.
    async fn disconnect(&self, id: &PeripheralId) -> LinkResult<()>;

    /// Discovers and returns every characteristic of every service.
    async fn discover_services(&self, id: &PeripheralId) -> LinkResult<Vec<GattCharacteristic>>;

    async fn write_characteristic(
        &self,
        id: &PeripheralId,
        service: Uuid,
        characteristic: Uuid,
        value: &[u8],
    ) -> LinkResult<()>;
}
