//! # gently-store: Persistence Layer for Gently Alarms
//!
//! This crate owns the alarm list and keeps it on disk. The list itself
//! ([`AlarmStore`]) is an ordered `Vec<Alarm>` in memory; every mutation
//! writes the full list as JSON through a [`KeyValueStore`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gently Data Flow                                 │
//! │                                                                         │
//! │  CLI command (gently add 07:00:00)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   gently-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  AlarmStore   │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │  (alarm.rs)   │───▶│   (kv.rs)     │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Vec<Alarm>    │    │ SqliteKvStore │    │ 001_kv_store │  │   │
//! │  │   │ next_id()     │    │ MemoryKvStore │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  └────────────────────────────────┼───────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   kv_store['alarms'] = '[{"id":1,"time":"07:00:00",...}]'      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`kv`] - `KeyValueStore` trait and the in-memory implementation
//! - [`repository`] - SQLite key-value repository and the `AlarmStore`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gently_store::{AlarmStore, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("gently.db")).await?;
//! let mut store = AlarmStore::open(db.kv()).await;
//!
//! let alarm = store.add("07:00:00".parse()?, true).await?;
//! println!("created alarm {}", alarm.id);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryKvStore};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::alarm::AlarmStore;
pub use repository::kv::SqliteKvStore;
