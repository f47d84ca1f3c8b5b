//! # Progress Events
//!
//! Listener surface for front ends following a session.
//!
//! ```text
//! on_phase_change(Scanning,     "Scanning for devices...",  None)
//! on_phase_change(Connecting,   "Connecting to device...",  None)
//! on_phase_change(Transmitting, "Sending alarm 1 of 2...",  Some(0.5))
//! on_phase_change(Transmitting, "Sending alarm 2 of 2...",  Some(1.0))
//! on_phase_change(Succeeded,    "Alarms sent to the device!", Some(1.0))
//! on_success(SyncReport { written: 2, total: 2, .. })
//! ```
//!
//! Callbacks run inline on the engine's task and must not block.

use tracing::{error, info};

use crate::error::SyncErrorKind;
use crate::link::PeripheralId;
use crate::session::SyncPhase;

/// What a session wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Create/update payloads to the upsert characteristic.
    Upsert,
    /// Delete payloads to the delete characteristic.
    Delete,
}

/// Summary of a successful session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub kind: TransferKind,
    pub device_id: PeripheralId,
    pub written: usize,
    pub total: usize,
}

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives session progress.
pub trait SyncEventEmitter: Send + Sync {
    fn on_phase_change(&self, phase: SyncPhase, message: &str, progress: Option<f32>);

    fn on_success(&self, report: &SyncReport);

    fn on_failure(&self, kind: SyncErrorKind, detail: &str);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl SyncEventEmitter for NoOpEmitter {
    fn on_phase_change(&self, _phase: SyncPhase, _message: &str, _progress: Option<f32>) {}
    fn on_success(&self, _report: &SyncReport) {}
    fn on_failure(&self, _kind: SyncErrorKind, _detail: &str) {}
}

/// Emitter that writes every event to the log.
pub struct LogEmitter;

impl SyncEventEmitter for LogEmitter {
    fn on_phase_change(&self, phase: SyncPhase, message: &str, progress: Option<f32>) {
        match progress {
            Some(p) => info!(%phase, progress = p, "{message}"),
            None => info!(%phase, "{message}"),
        }
    }

    fn on_success(&self, report: &SyncReport) {
        info!(
            device_id = %report.device_id,
            written = report.written,
            kind = ?report.kind,
            "Sync complete"
        );
    }

    fn on_failure(&self, kind: SyncErrorKind, detail: &str) {
        error!(%kind, "{detail}");
    }
}
