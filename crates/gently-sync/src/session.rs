//! # Sync Session State
//!
//! Phase, progress and target of the session currently (or last) run by a
//! [`crate::SyncEngine`].
//!
//! ## Phase Transitions
//! ```text
//!                run(records)
//!   ┌──────┐   (non-empty)    ┌──────────┐  ScanStopped + match  ┌────────────┐
//!   │ Idle │ ───────────────▶ │ Scanning │ ────────────────────▶ │ Connecting │
//!   └──────┘                  └────┬─────┘                       └─────┬──────┘
//!      ▲                           │ not found / timeout               │ ok
//!      │                           ▼                                   ▼
//!      │                      ┌────────┐  missing char.  ┌─────────────────────┐
//!      │◀──── session end ─── │ Failed │ ◀────────────── │ DiscoveringServices │
//!      │                      └────────┘                 └──────────┬──────────┘
//!      │                           ▲ write error / disconnect       │ found
//!      │                           │                                ▼
//!      │                      ┌────┴──────┐   all written   ┌──────────────┐
//!      └──── session end ──── │ Succeeded │ ◀────────────── │ Transmitting │
//!                             └───────────┘                 └──────────────┘
//! ```

use std::fmt;

use crate::link::PeripheralId;

/// Step of a sync session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Scanning,
    Connecting,
    DiscoveringServices,
    Transmitting,
    Succeeded,
    Failed,
}

impl SyncPhase {
    /// True between `Idle` and a terminal phase.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncPhase::Scanning
                | SyncPhase::Connecting
                | SyncPhase::DiscoveringServices
                | SyncPhase::Transmitting
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncPhase::Succeeded | SyncPhase::Failed)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Idle => write!(f, "idle"),
            SyncPhase::Scanning => write!(f, "scanning"),
            SyncPhase::Connecting => write!(f, "connecting"),
            SyncPhase::DiscoveringServices => write!(f, "discovering_services"),
            SyncPhase::Transmitting => write!(f, "transmitting"),
            SyncPhase::Succeeded => write!(f, "succeeded"),
            SyncPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Snapshot of a session.
///
/// ## Invariants
/// - `progress` is only set while `Transmitting`, and kept at its final
///   value on `Succeeded`
/// - `target_device_id` is set once connected and cleared on disconnect
/// - once the outcome is reported the engine resets to the default `Idle`
///   snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncSession {
    pub phase: SyncPhase,
    /// Fraction of records written, in `[0, 1]`.
    pub progress: Option<f32>,
    /// Human-readable status line.
    pub message: String,
    pub target_device_id: Option<PeripheralId>,
}

impl SyncSession {
    /// Moves to `phase`, dropping progress unless the phase keeps it.
    pub(crate) fn enter(&mut self, phase: SyncPhase, message: impl Into<String>) {
        self.phase = phase;
        self.message = message.into();
        if !matches!(phase, SyncPhase::Transmitting | SyncPhase::Succeeded) {
            self.progress = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_idle() {
        let s = SyncSession::default();
        assert_eq!(s.phase, SyncPhase::Idle);
        assert!(s.progress.is_none());
        assert!(s.target_device_id.is_none());
    }

    #[test]
    fn test_enter_clears_progress_outside_transfer() {
        let mut s = SyncSession::default();
        s.enter(SyncPhase::Transmitting, "Sending alarm 1 of 1...");
        s.progress = Some(1.0);

        s.enter(SyncPhase::Succeeded, "done");
        assert_eq!(s.progress, Some(1.0));

        s.enter(SyncPhase::Failed, "boom");
        assert_eq!(s.progress, None);
    }

    #[test]
    fn test_phase_flags() {
        assert!(SyncPhase::Scanning.is_active());
        assert!(!SyncPhase::Idle.is_active());
        assert!(SyncPhase::Failed.is_terminal());
        assert!(!SyncPhase::Transmitting.is_terminal());
        assert_eq!(SyncPhase::DiscoveringServices.to_string(), "discovering_services");
    }
}
