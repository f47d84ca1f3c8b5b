//! # Commands
//!
//! One function per subcommand. Output goes to a caller-supplied writer.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── alarms.rs   ◄─── list, add, delete, enable, disable, set-time
//! ├── device.rs   ◄─── push, forget (Bluetooth)
//! └── config.rs   ◄─── config show, config init
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gently enable 2                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Cli::parse ── AlarmId::from_str("2") ──▶ Command::Enable { id }       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  AppContext::open_store ──▶ (Database, AlarmStore)                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  alarms::set_enabled(&mut store, id, true, &mut stdout)                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  "Alarm 2 enabled"                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod alarms;
pub mod config;
pub mod device;
