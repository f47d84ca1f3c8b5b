//! # Device Commands
//!
//! `push` sends the whole list to the upsert characteristic; `forget` sends
//! ids to the delete characteristic. Both need the `btleplug` feature,
//! except `push --dry-run`, which only prints what would be written.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use gently_core::{wire, Alarm, AlarmId};
use gently_sync::{GentlyConfig, SyncEngine, SyncError, SyncEventEmitter};
use tracing::debug;

/// Prints each upsert payload next to the line it decodes to.
pub fn dry_run(alarms: &[Alarm], out: &mut dyn Write) -> Result<()> {
    if alarms.is_empty() {
        return Err(SyncError::NoAlarms.into());
    }

    let total = alarms.len();
    for (index, alarm) in alarms.iter().enumerate() {
        let payload = wire::encode_upsert(alarm);
        let decoded = wire::decode_upsert_line(&payload)?;
        writeln!(
            out,
            "{}/{total}  {}  {}",
            index + 1,
            String::from_utf8_lossy(&payload),
            wire::upsert_line(&decoded)
        )?;
    }
    Ok(())
}

/// Runs an upsert session. Failures were already shown by the emitter.
pub async fn push(engine: &SyncEngine, alarms: &[Alarm]) -> ExitCode {
    match engine.run(alarms).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = %e, "push failed");
            ExitCode::FAILURE
        }
    }
}

/// Runs a delete session for `ids`.
pub async fn forget(engine: &SyncEngine, ids: &[AlarmId]) -> ExitCode {
    match engine.run_deletes(ids).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = %e, "forget failed");
            ExitCode::FAILURE
        }
    }
}

/// Opens the first Bluetooth adapter and builds an engine over it.
#[cfg(feature = "btleplug")]
pub async fn open_engine(
    config: &GentlyConfig,
    emitter: Arc<dyn SyncEventEmitter>,
) -> Result<SyncEngine> {
    use anyhow::Context as _;
    use gently_sync::btle::BtleLink;

    let link = BtleLink::new()
        .await
        .context("Failed to open the Bluetooth adapter")?;
    Ok(SyncEngine::with_emitter(Arc::new(link), config, emitter)?)
}

#[cfg(not(feature = "btleplug"))]
pub async fn open_engine(
    _config: &GentlyConfig,
    _emitter: Arc<dyn SyncEventEmitter>,
) -> Result<SyncEngine> {
    anyhow::bail!("This build has no Bluetooth support; rebuild with `--features btleplug`")
}
