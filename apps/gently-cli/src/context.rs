//! # Application Context
//!
//! Configuration and storage resolved from the global flags.
//!
//! ## Database Path Resolution
//! ```text
//! --db <path>  ──▶  GENTLY_DB_PATH / [storage] database_path  ──▶  data dir
//! (highest)                                                      (lowest)
//!
//!   Linux:  ~/.local/share/alarms/gently.db
//!   macOS:  ~/Library/Application Support/com.gently.alarms/gently.db
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use gently_store::{AlarmStore, Database, DbConfig};
use gently_sync::GentlyConfig;
use tracing::{debug, info};

pub struct AppContext {
    pub config: GentlyConfig,
    /// Explicit `--config` path, if given.
    pub config_path: Option<PathBuf>,
    db_override: Option<PathBuf>,
}

impl AppContext {
    /// Loads configuration; does not touch the database.
    pub fn load(config_path: Option<PathBuf>, db_override: Option<PathBuf>) -> Result<Self> {
        let config = GentlyConfig::load(config_path.clone())
            .context("Failed to load configuration")?;

        Ok(AppContext {
            config,
            config_path,
            db_override,
        })
    }

    /// Builds a context from an already resolved configuration.
    pub fn with_config(config: GentlyConfig, db_override: Option<PathBuf>) -> Self {
        AppContext {
            config,
            config_path: None,
            db_override,
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        self.db_override
            .clone()
            .or_else(|| self.config.database_path())
            .context("No database path: pass --db or set GENTLY_DB_PATH")
    }

    /// Opens the database and hydrates the alarm store.
    pub async fn open_store(&self) -> Result<(Database, AlarmStore)> {
        let path = self.database_path()?;
        debug!(?path, "Opening alarm database");

        let db = Database::new(DbConfig::new(&path))
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        if !db.health_check().await {
            anyhow::bail!("{} does not answer queries", path.display());
        }
        let store = AlarmStore::open(db.kv()).await;

        info!(?path, alarms = store.len(), "Alarm database ready");
        Ok((db, store))
    }
}
