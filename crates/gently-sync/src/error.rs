//! # Sync Error Types
//!
//! Error types for peripheral sync sessions.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Precondition   │  │   Discovery     │  │     Transfer            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NoAlarms       │  │  ScanTimeout    │  │  CharacteristicNotFound │ │
//! │  │  SessionBusy    │  │  DeviceNotFound │  │  WriteFailed            │ │
//! │  │                 │  │  Connection     │  │  Disconnected           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │  Configuration  │                                                    │
//! │  │                 │                                                    │
//! │  │  InvalidConfig  │                                                    │
//! │  │  ConfigLoad/Save│                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every session error is terminal for that session. The engine never
//! retries on its own; [`SyncError::is_retryable`] tells the caller whether
//! running again is worth it.

use std::fmt;

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering every way a session can end badly.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Precondition Errors
    // =========================================================================
    /// Nothing to send.
    ///
    /// ## When This Occurs
    /// - `run` called with an empty alarm list
    /// - `run_deletes` called with an empty id list
    #[error("No alarms to send")]
    NoAlarms,

    /// Another session is still running on this engine.
    #[error("A sync session is already in progress")]
    SessionBusy,

    // =========================================================================
    // Discovery Errors
    // =========================================================================
    /// The link never reported the end of the scan.
    #[error("Scan did not finish within {waited_secs} seconds")]
    ScanTimeout { waited_secs: u64 },

    /// No peripheral with the configured name was seen, or scanning could
    /// not start at all.
    #[error("{name} was not found nearby{}", fmt_cause(.cause))]
    DeviceNotFound { name: String, cause: Option<String> },

    /// The peripheral refused or dropped the connection attempt.
    #[error("Failed to connect to {device_id}: {cause}")]
    ConnectionFailed { device_id: String, cause: String },

    // =========================================================================
    // Transfer Errors
    // =========================================================================
    /// The target service/characteristic pair is not exposed by the
    /// peripheral, or service discovery itself failed.
    #[error("Required characteristic {service}/{characteristic} not found{}", fmt_cause(.cause))]
    CharacteristicNotFound {
        service: String,
        characteristic: String,
        cause: Option<String>,
    },

    /// A characteristic write failed. Earlier writes stay applied.
    #[error("Failed to send alarm {record_id} (record {index}): {cause}")]
    WriteFailed {
        record_id: u32,
        index: usize,
        cause: String,
    },

    /// The peripheral disconnected in the middle of the session.
    #[error("Device {device_id} disconnected")]
    Disconnected { device_id: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid sync configuration.
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal engine error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn fmt_cause(cause: &Option<String>) -> String {
    match cause {
        Some(c) => format!(": {c}"),
        None => String::new(),
    }
}

// =============================================================================
// Error Kind
// =============================================================================

/// Fieldless discriminant of [`SyncError`], handed to progress listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncErrorKind {
    NoAlarms,
    SessionBusy,
    ScanTimeout,
    DeviceNotFound,
    ConnectionFailed,
    CharacteristicNotFound,
    WriteFailed,
    Disconnected,
    Config,
    Internal,
}

impl fmt::Display for SyncErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncErrorKind::NoAlarms => "NoAlarmsError",
            SyncErrorKind::SessionBusy => "SessionBusyError",
            SyncErrorKind::ScanTimeout => "ScanTimeoutError",
            SyncErrorKind::DeviceNotFound => "DeviceNotFoundError",
            SyncErrorKind::ConnectionFailed => "ConnectionError",
            SyncErrorKind::CharacteristicNotFound => "CharacteristicNotFoundError",
            SyncErrorKind::WriteFailed => "WriteError",
            SyncErrorKind::Disconnected => "DisconnectedError",
            SyncErrorKind::Config => "ConfigError",
            SyncErrorKind::Internal => "InternalError",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns the fieldless kind of this error.
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::NoAlarms => SyncErrorKind::NoAlarms,
            SyncError::SessionBusy => SyncErrorKind::SessionBusy,
            SyncError::ScanTimeout { .. } => SyncErrorKind::ScanTimeout,
            SyncError::DeviceNotFound { .. } => SyncErrorKind::DeviceNotFound,
            SyncError::ConnectionFailed { .. } => SyncErrorKind::ConnectionFailed,
            SyncError::CharacteristicNotFound { .. } => SyncErrorKind::CharacteristicNotFound,
            SyncError::WriteFailed { .. } => SyncErrorKind::WriteFailed,
            SyncError::Disconnected { .. } => SyncErrorKind::Disconnected,
            SyncError::InvalidConfig(_)
            | SyncError::ConfigLoadFailed(_)
            | SyncError::ConfigSaveFailed(_) => SyncErrorKind::Config,
            SyncError::Internal(_) => SyncErrorKind::Internal,
        }
    }

    /// Returns true if running the session again may succeed.
    ///
    /// ## Retryable Errors
    /// - Radio conditions (scan timeout, device not seen, connect failure)
    /// - Mid-session drops (write failure, disconnect)
    /// - Another session was running
    ///
    /// ## Non-Retryable Errors
    /// - Nothing to send
    /// - The peripheral lacks the characteristic
    /// - Configuration errors
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::SessionBusy
                | SyncError::ScanTimeout { .. }
                | SyncError::DeviceNotFound { .. }
                | SyncError::ConnectionFailed { .. }
                | SyncError::WriteFailed { .. }
                | SyncError::Disconnected { .. }
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        self.kind() == SyncErrorKind::Config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(SyncError::ScanTimeout { waited_secs: 10 }.is_retryable());
        assert!(SyncError::Disconnected {
            device_id: "AA:BB".into()
        }
        .is_retryable());

        assert!(!SyncError::NoAlarms.is_retryable());
        assert!(!SyncError::InvalidConfig("bad".into()).is_retryable());
        assert!(!SyncError::CharacteristicNotFound {
            service: "s".into(),
            characteristic: "c".into(),
            cause: None,
        }
        .is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = SyncError::DeviceNotFound {
            name: "GentlyDevice".into(),
            cause: None,
        };
        assert_eq!(err.to_string(), "GentlyDevice was not found nearby");

        let err = SyncError::DeviceNotFound {
            name: "GentlyDevice".into(),
            cause: Some("adapter off".into()),
        };
        assert_eq!(err.to_string(), "GentlyDevice was not found nearby: adapter off");

        let err = SyncError::WriteFailed {
            record_id: 4,
            index: 1,
            cause: "GATT error".into(),
        };
        assert!(err.to_string().contains("alarm 4"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SyncError::NoAlarms.kind().to_string(), "NoAlarmsError");
        assert_eq!(
            SyncError::ScanTimeout { waited_secs: 1 }.kind().to_string(),
            "ScanTimeoutError"
        );
        assert!(SyncError::ConfigSaveFailed("x".into()).is_config_error());
    }
}
