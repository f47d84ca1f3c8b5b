//! # Gently Configuration
//!
//! Configuration for the sync engine and the local database location.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GENTLY_DEVICE_NAME=GentlyDevice                                    │
//! │     GENTLY_SCAN_SECS=8                                                 │
//! │     GENTLY_DB_PATH=/tmp/gently.db                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/alarms/gently.toml (Linux)                               │
//! │     ~/Library/Application Support/com.gently.alarms/gently.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     GentlyDevice, the ...def0/def1/def2 UUIDs, 5 s scan                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # gently.toml
//! [device]
//! name = "GentlyDevice"
//! service_uuid = "12345678-1234-5678-1234-56789abcdef0"
//! upsert_characteristic_uuid = "12345678-1234-5678-1234-56789abcdef1"
//! delete_characteristic_uuid = "12345678-1234-5678-1234-56789abcdef2"
//!
//! [timing]
//! scan_secs = 5
//! scan_watchdog_grace_secs = 5
//! connect_settle_ms = 1000
//! write_pacing_ms = 500
//!
//! [storage]
//! database_path = "/var/lib/gently/gently.db"   # optional
//! ```

use std::path::PathBuf;
use std::time::Duration;

use gently_core::{
    ALARM_SERVICE_UUID, DELETE_CHARACTERISTIC_UUID, DEVICE_NAME, UPSERT_CHARACTERISTIC_UUID,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Device Settings
// =============================================================================

/// Identity of the peripheral and its GATT layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Advertised name to look for after scanning.
    #[serde(default = "default_device_name")]
    pub name: String,

    /// Service holding both alarm characteristics.
    #[serde(default = "default_service_uuid")]
    pub service_uuid: String,

    /// Characteristic receiving upsert payloads.
    #[serde(default = "default_upsert_uuid")]
    pub upsert_characteristic_uuid: String,

    /// Characteristic receiving delete payloads.
    #[serde(default = "default_delete_uuid")]
    pub delete_characteristic_uuid: String,
}

fn default_device_name() -> String {
    DEVICE_NAME.to_string()
}

fn default_service_uuid() -> String {
    ALARM_SERVICE_UUID.to_string()
}

fn default_upsert_uuid() -> String {
    UPSERT_CHARACTERISTIC_UUID.to_string()
}

fn default_delete_uuid() -> String {
    DELETE_CHARACTERISTIC_UUID.to_string()
}

impl Default for DeviceSettings {
    fn default() -> Self {
        DeviceSettings {
            name: default_device_name(),
            service_uuid: default_service_uuid(),
            upsert_characteristic_uuid: default_upsert_uuid(),
            delete_characteristic_uuid: default_delete_uuid(),
        }
    }
}

// =============================================================================
// Timing Settings
// =============================================================================

/// Delays and timeouts of a sync session.
///
/// ## Session Timeline
/// ```text
/// scan ──── scan_secs ────▶ ScanStopped
///      └─ scan_secs + scan_watchdog_grace_secs ─▶ ScanTimeout
///
/// connect ─ connect_settle_ms ─▶ discover
///
/// pacing ─▶ write #1 ─▶ pacing ─▶ write #2 ─▶ pacing ─▶ ...
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// How long the link scans for.
    #[serde(default = "default_scan_secs")]
    pub scan_secs: u64,

    /// Extra time allowed for the link to report the end of the scan.
    #[serde(default = "default_scan_grace")]
    pub scan_watchdog_grace_secs: u64,

    /// Wait after connecting, before service discovery.
    #[serde(default = "default_connect_settle")]
    pub connect_settle_ms: u64,

    /// Wait before the first write and after each write.
    #[serde(default = "default_write_pacing")]
    pub write_pacing_ms: u64,
}

fn default_scan_secs() -> u64 {
    5
}

fn default_scan_grace() -> u64 {
    5
}

fn default_connect_settle() -> u64 {
    1000
}

fn default_write_pacing() -> u64 {
    500
}

impl Default for TimingSettings {
    fn default() -> Self {
        TimingSettings {
            scan_secs: default_scan_secs(),
            scan_watchdog_grace_secs: default_scan_grace(),
            connect_settle_ms: default_connect_settle(),
            write_pacing_ms: default_write_pacing(),
        }
    }
}

impl TimingSettings {
    pub fn scan_duration(&self) -> Duration {
        Duration::from_secs(self.scan_secs)
    }

    /// Upper bound on waiting for `ScanStopped`.
    pub fn scan_watchdog(&self) -> Duration {
        Duration::from_secs(self.scan_secs.saturating_add(self.scan_watchdog_grace_secs))
    }

    pub fn connect_settle(&self) -> Duration {
        Duration::from_millis(self.connect_settle_ms)
    }

    pub fn write_pacing(&self) -> Duration {
        Duration::from_millis(self.write_pacing_ms)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the alarm database lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Explicit database path. `None` uses the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete Gently configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GentlyConfig {
    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub timing: TimingSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl GentlyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (gently.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, returning the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.device.name.trim().is_empty() {
            return Err(SyncError::InvalidConfig("device.name must not be empty".into()));
        }

        for (field, value) in [
            ("device.service_uuid", &self.device.service_uuid),
            (
                "device.upsert_characteristic_uuid",
                &self.device.upsert_characteristic_uuid,
            ),
            (
                "device.delete_characteristic_uuid",
                &self.device.delete_characteristic_uuid,
            ),
        ] {
            parse_uuid(field, value)?;
        }

        if self.timing.scan_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "timing.scan_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("GENTLY_DEVICE_NAME") {
            debug!(device_name = %name, "Overriding device name from environment");
            self.device.name = name;
        }

        if let Some(secs) = lookup("GENTLY_SCAN_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.timing.scan_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric GENTLY_SCAN_SECS"),
            }
        }

        if let Some(path) = lookup("GENTLY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "gently", "alarms")
            .map(|dirs| dirs.config_dir().join("gently.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the configured database path, or the platform default.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.storage.database_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "gently", "alarms")
                .map(|dirs| dirs.data_dir().join("gently.db"))
        })
    }

    pub fn service_uuid(&self) -> SyncResult<Uuid> {
        parse_uuid("device.service_uuid", &self.device.service_uuid)
    }

    pub fn upsert_characteristic_uuid(&self) -> SyncResult<Uuid> {
        parse_uuid(
            "device.upsert_characteristic_uuid",
            &self.device.upsert_characteristic_uuid,
        )
    }

    pub fn delete_characteristic_uuid(&self) -> SyncResult<Uuid> {
        parse_uuid(
            "device.delete_characteristic_uuid",
            &self.device.delete_characteristic_uuid,
        )
    }
}

fn parse_uuid(field: &str, value: &str) -> SyncResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| SyncError::InvalidConfig(format!("{field} '{value}' is not a UUID: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = GentlyConfig::default();
        assert_eq!(config.device.name, "GentlyDevice");
        assert_eq!(config.timing.scan_secs, 5);
        assert_eq!(config.timing.scan_watchdog(), Duration::from_secs(10));
        assert_eq!(config.timing.connect_settle(), Duration::from_millis(1000));
        assert_eq!(config.timing.write_pacing(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GentlyConfig::default();

        config.device.name = "  ".into();
        assert!(config.validate().is_err());

        config.device.name = "GentlyDevice".into();
        config.device.upsert_characteristic_uuid = "not-a-uuid".into();
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("upsert_characteristic_uuid"));

        config.device.upsert_characteristic_uuid = UPSERT_CHARACTERISTIC_UUID.into();
        config.timing.scan_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_uuid_accessors_ignore_case() {
        let mut config = GentlyConfig::default();
        config.device.service_uuid = ALARM_SERVICE_UUID.to_uppercase();
        assert_eq!(
            config.service_uuid().unwrap(),
            Uuid::parse_str(ALARM_SERVICE_UUID).unwrap()
        );
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("GENTLY_DEVICE_NAME", "BedsideGently"),
            ("GENTLY_SCAN_SECS", "8"),
            ("GENTLY_DB_PATH", "/tmp/alarms.db"),
        ]
        .into_iter()
        .collect();

        let mut config = GentlyConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.device.name, "BedsideGently");
        assert_eq!(config.timing.scan_secs, 8);
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/tmp/alarms.db"))
        );
    }

    #[test]
    fn test_bad_numeric_override_is_ignored() {
        let mut config = GentlyConfig::default();
        config.apply_overrides(|k| (k == "GENTLY_SCAN_SECS").then(|| "soon".to_string()));
        assert_eq!(config.timing.scan_secs, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: GentlyConfig = toml::from_str(
            r#"
            [timing]
            write_pacing_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.write_pacing_ms, 250);
        assert_eq!(config.timing.scan_secs, 5);
        assert_eq!(config.device, DeviceSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("gently.toml");

        let mut config = GentlyConfig::default();
        config.timing.connect_settle_ms = 1500;
        let written = config.save(Some(path.clone())).unwrap();
        assert_eq!(written, path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[device]"));
        assert!(contents.contains("[timing]"));

        let loaded: GentlyConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.timing.connect_settle_ms, 1500);
    }
}
