//! # Repository Module
//!
//! Storage-backed repositories for Gently Alarms.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  store.add(time, true)                                          │
//! │       ▼                                                                 │
//! │  AlarmStore                                                            │
//! │  ├── list / get                 (memory only)                          │
//! │  ├── add / delete               (memory, then persist)                 │
//! │  └── set_enabled / set_time     (memory, then persist)                 │
//! │       │                                                                 │
//! │       │  kv.set("alarms", json)                                         │
//! │       ▼                                                                 │
//! │  SqliteKvStore                                                         │
//! │  └── kv_store table                                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`alarm::AlarmStore`] - Ordered alarm list with id allocation
//! - [`kv::SqliteKvStore`] - `KeyValueStore` over the `kv_store` table

pub mod alarm;
pub mod kv;
