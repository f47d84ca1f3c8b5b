//! # gently-sync: Peripheral Sync Engine for Gently Alarms
//!
//! This crate pushes the local alarm list to the Gently Bluetooth LE
//! peripheral, one record per characteristic write.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sync Engine Architecture                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  SyncEngine (one session at a time)              │  │
//! │  │                                                                  │  │
//! │  │  run(&[Alarm])        → upsert characteristic (...def1)         │  │
//! │  │  run_deletes(&[Id])   → delete characteristic (...def2)         │  │
//! │  └───────────────┬───────────────────────────────┬──────────────────┘  │
//! │                  │ calls                         │ reports             │
//! │                  ▼                               ▼                      │
//! │  ┌────────────────────────────┐   ┌────────────────────────────────┐   │
//! │  │ DeviceLink (trait)         │   │ SyncEventEmitter (trait)       │   │
//! │  │                            │   │                                │   │
//! │  │ scan / connect / discover  │   │ on_phase_change / on_success / │   │
//! │  │ write / disconnect         │   │ on_failure                     │   │
//! │  │ + LinkEvent channel        │   │                                │   │
//! │  └──────────────┬─────────────┘   └────────────────────────────────┘   │
//! │                 │                                                       │
//! │      ┌──────────┴───────────┐                                          │
//! │      ▼                      ▼                                          │
//! │  BtleLink (feature      scripted links                                 │
//! │  "btleplug")            in tests                                       │
//! │                                                                         │
//! │  STATUS (SyncSession): phase • progress • message • target device     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - `SyncEngine` session pipeline
//! - [`link`] - `DeviceLink` trait and link events
//! - [`session`] - `SyncPhase` and the `SyncSession` snapshot
//! - [`events`] - Progress listener surface
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Sync error types
//! - `btle` - btleplug-backed link (feature `btleplug`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gently_sync::{btle::BtleLink, GentlyConfig, SyncEngine};
//!
//! let config = GentlyConfig::load_or_default(None);
//! let link = Arc::new(BtleLink::new().await?);
//! let engine = SyncEngine::new(link, &config)?;
//!
//! let report = engine.run(store.list()).await?;
//! println!("Wrote {} alarm(s) to {}", report.written, report.device_id);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod link;
pub mod session;

#[cfg(feature = "btleplug")]
pub mod btle;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{DeviceSettings, GentlyConfig, StorageSettings, TimingSettings};
pub use engine::SyncEngine;
pub use error::{SyncError, SyncErrorKind, SyncResult};
pub use events::{LogEmitter, NoOpEmitter, SyncEventEmitter, SyncReport, TransferKind};
pub use link::{
    DeviceLink, GattCharacteristic, LinkError, LinkEvent, LinkResult, PeripheralDescriptor,
    PeripheralId, ScanFilter,
};
pub use session::{SyncPhase, SyncSession};
