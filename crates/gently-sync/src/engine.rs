//! # Sync Engine
//!
//! Drives one session against the peripheral: scan, connect, discover the
//! alarm characteristic, then write every record with pacing.
//!
//! ## Session Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SyncEngine::run(records)                         │
//! │                                                                         │
//! │  records empty? ──yes──▶ NoAlarms (no phase change)                     │
//! │  session running? ─yes─▶ SessionBusy                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  drain stale link events                                               │
//! │       │                                                                 │
//! │  Scanning ──── scan(5s) ─── wait ScanStopped (watchdog 10s, both)      │
//! │       │        └─ discovered() → first named "GentlyDevice"            │
//! │       ▼                                                                 │
//! │  Connecting ── connect(id)                                             │
//! │       ▼                                                                 │
//! │  DiscoveringServices ── settle 1000ms ── discover_services(id)         │
//! │       │                 └─ (service, characteristic) present?          │
//! │       ▼                                                                 │
//! │  Transmitting ── pacing ─▶ write #1 ─▶ pacing ─▶ write #2 ─▶ ...       │
//! │       ▼                                                                 │
//! │  Succeeded / Failed ── disconnect (best effort) ── Idle, released      │
//! │                                                                         │
//! │  Every await above races the link event channel: a Disconnected for   │
//! │  the target, or the channel closing, ends the session immediately.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Session At A Time
//! The engine owns the link's event receiver behind a mutex. A session holds
//! that lock from start to finish; `run` uses `try_lock`, so a second caller
//! gets `SessionBusy` without waiting.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use gently_core::{wire, Alarm, AlarmId};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::{sleep, sleep_until, timeout_at, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{GentlyConfig, TimingSettings};
use crate::error::{SyncError, SyncResult};
use crate::events::{LogEmitter, SyncEventEmitter, SyncReport, TransferKind};
use crate::link::{DeviceLink, GattCharacteristic, LinkEvent, PeripheralId, ScanFilter};
use crate::session::{SyncPhase, SyncSession};

// =============================================================================
// Settings
// =============================================================================

/// Configuration resolved once at construction.
#[derive(Debug, Clone)]
struct EngineSettings {
    device_name: String,
    service: Uuid,
    upsert_characteristic: Uuid,
    delete_characteristic: Uuid,
    timing: TimingSettings,
}

impl EngineSettings {
    fn from_config(config: &GentlyConfig) -> SyncResult<Self> {
        config.validate()?;
        Ok(EngineSettings {
            device_name: config.device.name.clone(),
            service: config.service_uuid()?,
            upsert_characteristic: config.upsert_characteristic_uuid()?,
            delete_characteristic: config.delete_characteristic_uuid()?,
            timing: config.timing.clone(),
        })
    }
}

/// Encoded records for one session.
struct Transfer {
    kind: TransferKind,
    characteristic: Uuid,
    payloads: Vec<Payload>,
}

struct Payload {
    record_id: AlarmId,
    bytes: Vec<u8>,
}

// =============================================================================
// Sync Engine
// =============================================================================

/// Pushes alarm lists to the Gently peripheral over a [`DeviceLink`].
pub struct SyncEngine {
    link: Arc<dyn DeviceLink>,

    /// Link events. Holding the lock is holding the session.
    events: Mutex<mpsc::Receiver<LinkEvent>>,

    settings: EngineSettings,

    /// Latest session snapshot.
    status: Arc<RwLock<SyncSession>>,

    emitter: Arc<dyn SyncEventEmitter>,
}

impl SyncEngine {
    /// Creates an engine that reports progress to the log.
    pub fn new(link: Arc<dyn DeviceLink>, config: &GentlyConfig) -> SyncResult<Self> {
        Self::with_emitter(link, config, Arc::new(LogEmitter))
    }

    /// Creates an engine with a custom event emitter.
    ///
    /// Takes the link's event receiver; a link whose events were already
    /// taken is rejected.
    pub fn with_emitter(
        link: Arc<dyn DeviceLink>,
        config: &GentlyConfig,
        emitter: Arc<dyn SyncEventEmitter>,
    ) -> SyncResult<Self> {
        let settings = EngineSettings::from_config(config)?;
        let events = link
            .events()
            .ok_or_else(|| SyncError::Internal("link events were already taken".into()))?;

        Ok(SyncEngine {
            link,
            events: Mutex::new(events),
            settings,
            status: Arc::new(RwLock::new(SyncSession::default())),
            emitter,
        })
    }

    /// Returns the running session's snapshot.
    ///
    /// Between sessions this is the default `Idle` snapshot: the outcome of a
    /// finished session is reported through the emitter and the `Result` of
    /// `run`, then the session is cleared.
    pub async fn status(&self) -> SyncSession {
        self.status.read().await.clone()
    }

    /// True while a session is running.
    pub fn is_busy(&self) -> bool {
        self.events.try_lock().is_err()
    }

    /// Sends every record, in order, to the upsert characteristic.
    ///
    /// `records` is a snapshot; later store edits do not affect a running
    /// session.
    pub async fn run(&self, records: &[Alarm]) -> SyncResult<SyncReport> {
        if records.is_empty() {
            return self.reject(SyncError::NoAlarms);
        }

        let transfer = Transfer {
            kind: TransferKind::Upsert,
            characteristic: self.settings.upsert_characteristic,
            payloads: records
                .iter()
                .map(|alarm| Payload {
                    record_id: alarm.id,
                    bytes: wire::encode_upsert(alarm),
                })
                .collect(),
        };

        self.start(transfer).await
    }

    /// Asks the peripheral to forget the given alarm ids.
    pub async fn run_deletes(&self, ids: &[AlarmId]) -> SyncResult<SyncReport> {
        if ids.is_empty() {
            return self.reject(SyncError::NoAlarms);
        }

        let transfer = Transfer {
            kind: TransferKind::Delete,
            characteristic: self.settings.delete_characteristic,
            payloads: ids
                .iter()
                .map(|&id| Payload {
                    record_id: id,
                    bytes: wire::encode_delete(id),
                })
                .collect(),
        };

        self.start(transfer).await
    }

    fn reject(&self, err: SyncError) -> SyncResult<SyncReport> {
        warn!(error = %err, "Sync request rejected");
        self.emitter.on_failure(err.kind(), &err.to_string());
        Err(err)
    }

    // =========================================================================
    // Session
    // =========================================================================

    async fn start(&self, transfer: Transfer) -> SyncResult<SyncReport> {
        // No await between here and taking the lock.
        let Ok(mut events) = self.events.try_lock() else {
            warn!("Sync requested while another session is running");
            return Err(SyncError::SessionBusy);
        };

        let mut irq = Interrupts::new(&mut *events);
        irq.drain();

        *self.status.write().await = SyncSession::default();

        info!(
            kind = ?transfer.kind,
            records = transfer.payloads.len(),
            "Sync session started"
        );

        let outcome = self.drive(&mut irq, &transfer).await;

        if matches!(outcome, Err(SyncError::Disconnected { .. })) {
            self.status.write().await.target_device_id = None;
        }

        let target = self.status.read().await.target_device_id.clone();
        if let Some(id) = target {
            if let Err(e) = self.link.disconnect(&id).await {
                debug!(device_id = %id, error = %e, "Disconnect after session failed");
            }
        }

        match &outcome {
            Ok(report) => {
                info!(device_id = %report.device_id, written = report.written, "Sync session succeeded");
                self.emitter.on_success(report);
            }
            Err(err) => {
                warn!(error = %err, kind = %err.kind(), "Sync session failed");
                self.enter(SyncPhase::Failed, err.to_string(), None).await;
                self.emitter.on_failure(err.kind(), &err.to_string());
            }
        }

        self.release().await;
        outcome
    }

    /// `Succeeded | Failed → Idle`: clears the session for the next run.
    async fn release(&self) {
        let mut status = self.status.write().await;
        if status.phase.is_terminal() {
            debug!(outcome = %status.phase, "Session released");
        }
        *status = SyncSession::default();
    }

    async fn drive(&self, irq: &mut Interrupts<'_>, transfer: &Transfer) -> SyncResult<SyncReport> {
        let timing = &self.settings.timing;
        let name = &self.settings.device_name;

        // ---------------------------------------------------------------------
        // Scanning
        // ---------------------------------------------------------------------
        self.enter(SyncPhase::Scanning, "Scanning for devices...", None).await;

        let watchdog = timing.scan_watchdog();
        let deadline = Instant::now() + watchdog;
        let not_found = |cause: Option<String>| SyncError::DeviceNotFound {
            name: name.clone(),
            cause,
        };

        irq.guard_until(
            self.link.scan(&ScanFilter::default(), timing.scan_duration()),
            deadline,
            watchdog,
        )
        .await?
        .map_err(|e| not_found(Some(e.to_string())))?;

        irq.wait_scan_stopped(deadline, watchdog).await?;

        let discovered = irq
            .guard(self.link.discovered())
            .await?
            .map_err(|e| not_found(Some(e.to_string())))?;

        debug!(count = discovered.len(), "Scan finished");

        let device = discovered
            .into_iter()
            .find(|p| p.name.as_deref() == Some(name.as_str()))
            .ok_or_else(|| not_found(None))?;

        info!(device_id = %device.id, "Found {name}");

        // ---------------------------------------------------------------------
        // Connecting
        // ---------------------------------------------------------------------
        self.enter(SyncPhase::Connecting, "Connecting to device...", None).await;

        irq.watch(device.id.clone());
        irq.guard(self.link.connect(&device.id))
            .await?
            .map_err(|e| SyncError::ConnectionFailed {
                device_id: device.id.to_string(),
                cause: e.to_string(),
            })?;

        self.status.write().await.target_device_id = Some(device.id.clone());
        info!(device_id = %device.id, "Connected");

        // ---------------------------------------------------------------------
        // Discovering services
        // ---------------------------------------------------------------------
        self.enter(SyncPhase::DiscoveringServices, "Retrieving services...", None)
            .await;

        irq.guard(sleep(timing.connect_settle())).await?;

        let missing = |cause: Option<String>| SyncError::CharacteristicNotFound {
            service: self.settings.service.to_string(),
            characteristic: transfer.characteristic.to_string(),
            cause,
        };

        let characteristics = irq
            .guard(self.link.discover_services(&device.id))
            .await?
            .map_err(|e| missing(Some(e.to_string())))?;

        let wanted = GattCharacteristic {
            service: self.settings.service,
            characteristic: transfer.characteristic,
        };
        if !characteristics.contains(&wanted) {
            return Err(missing(None));
        }

        // ---------------------------------------------------------------------
        // Transmitting
        // ---------------------------------------------------------------------
        let total = transfer.payloads.len();
        let verb = match transfer.kind {
            TransferKind::Upsert => "Sending",
            TransferKind::Delete => "Deleting",
        };

        self.enter(
            SyncPhase::Transmitting,
            format!("{verb} {total} alarm(s)..."),
            Some(0.0),
        )
        .await;

        irq.guard(sleep(timing.write_pacing())).await?;

        for (index, payload) in transfer.payloads.iter().enumerate() {
            let progress = (index + 1) as f32 / total as f32;
            self.enter(
                SyncPhase::Transmitting,
                format!("{verb} alarm {} of {total}...", index + 1),
                Some(progress),
            )
            .await;

            debug!(
                alarm_id = %payload.record_id,
                index,
                payload = %String::from_utf8_lossy(&payload.bytes),
                "Writing characteristic"
            );

            irq.guard(self.link.write_characteristic(
                &device.id,
                self.settings.service,
                transfer.characteristic,
                &payload.bytes,
            ))
            .await?
            .map_err(|e| SyncError::WriteFailed {
                record_id: payload.record_id.get(),
                index,
                cause: e.to_string(),
            })?;

            irq.guard(sleep(timing.write_pacing())).await?;
        }

        let done = match transfer.kind {
            TransferKind::Upsert => "Alarms sent to the device!",
            TransferKind::Delete => "Alarms deleted from the device!",
        };
        self.enter(SyncPhase::Succeeded, done, Some(1.0)).await;

        Ok(SyncReport {
            kind: transfer.kind,
            device_id: device.id,
            written: total,
            total,
        })
    }

    /// Updates the snapshot and notifies the emitter.
    async fn enter(&self, phase: SyncPhase, message: impl Into<String>, progress: Option<f32>) {
        let message = message.into();
        {
            let mut s = self.status.write().await;
            s.enter(phase, message.clone());
            if progress.is_some() {
                s.progress = progress;
            }
        }
        debug!(%phase, ?progress, "{message}");
        self.emitter.on_phase_change(phase, &message, progress);
    }
}

// =============================================================================
// Interrupts
// =============================================================================

/// The link event channel, seen from inside a session.
struct Interrupts<'a> {
    events: &'a mut mpsc::Receiver<LinkEvent>,
    /// Peripheral whose disconnect ends the session.
    target: Option<PeripheralId>,
    scan_stopped: bool,
}

impl<'a> Interrupts<'a> {
    fn new(events: &'a mut mpsc::Receiver<LinkEvent>) -> Self {
        Interrupts {
            events,
            target: None,
            scan_stopped: false,
        }
    }

    /// Drops events left over from before this session.
    fn drain(&mut self) {
        let mut stale = 0usize;
        while self.events.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!(stale, "Discarded stale link events");
        }
    }

    fn watch(&mut self, id: PeripheralId) {
        self.target = Some(id);
    }

    fn handle(&mut self, event: Option<LinkEvent>) -> SyncResult<()> {
        match event {
            None => Err(SyncError::Disconnected {
                device_id: self
                    .target
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "link".to_string()),
            }),
            Some(LinkEvent::ScanStopped) => {
                self.scan_stopped = true;
                Ok(())
            }
            Some(LinkEvent::Disconnected { peripheral_id }) => {
                if self.target.as_ref() == Some(&peripheral_id) {
                    warn!(device_id = %peripheral_id, "Device disconnected mid-session");
                    Err(SyncError::Disconnected {
                        device_id: peripheral_id.to_string(),
                    })
                } else {
                    debug!(device_id = %peripheral_id, "Ignoring disconnect of another peripheral");
                    Ok(())
                }
            }
        }
    }

    /// Runs `fut` unless a link event ends the session first.
    async fn guard<F>(&mut self, fut: F) -> SyncResult<F::Output>
    where
        F: Future,
    {
        tokio::pin!(fut);
        loop {
            tokio::select! {
                biased;
                event = self.events.recv() => self.handle(event)?,
                out = &mut fut => return Ok(out),
            }
        }
    }

    /// [`Self::guard`], giving up at `deadline` with `ScanTimeout`.
    async fn guard_until<F>(
        &mut self,
        fut: F,
        deadline: Instant,
        watchdog: Duration,
    ) -> SyncResult<F::Output>
    where
        F: Future,
    {
        match timeout_at(deadline, self.guard(fut)).await {
            Ok(out) => out,
            Err(_) => Err(SyncError::ScanTimeout {
                waited_secs: watchdog.as_secs(),
            }),
        }
    }

    /// Waits for `ScanStopped`, giving up at `deadline`.
    async fn wait_scan_stopped(&mut self, deadline: Instant, watchdog: Duration) -> SyncResult<()> {
        let timer = sleep_until(deadline);
        tokio::pin!(timer);
        while !self.scan_stopped {
            tokio::select! {
                biased;
                event = self.events.recv() => self.handle(event)?,
                _ = &mut timer => {
                    return Err(SyncError::ScanTimeout {
                        waited_secs: watchdog.as_secs(),
                    });
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
