//! # Alarm Commands
//!
//! Local edits of the alarm list. None of these touch Bluetooth; run
//! `gently push` afterwards to update the device.

use std::io::Write;

use anyhow::{bail, Result};
use gently_core::{Alarm, AlarmId, AlarmTime};
use gently_store::AlarmStore;
use tracing::debug;

/// Prints the list as a table, or as the stored JSON array.
pub fn list(store: &AlarmStore, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, store.list())?;
        writeln!(out)?;
        return Ok(());
    }

    if store.is_empty() {
        writeln!(out, "No alarms")?;
        return Ok(());
    }

    writeln!(out, "{:>4}  {:<8}  {}", "ID", "TIME", "STATE")?;
    for alarm in store.list() {
        writeln!(
            out,
            "{:>4}  {:<8}  {}",
            alarm.id,
            alarm.time,
            if alarm.enabled { "on" } else { "off" }
        )?;
    }
    Ok(())
}

pub async fn add(
    store: &mut AlarmStore,
    time: AlarmTime,
    enabled: bool,
    out: &mut dyn Write,
) -> Result<Alarm> {
    let alarm = store.add(time, enabled).await?;
    debug!(alarm_id = %alarm.id, "add command");
    writeln!(out, "Added alarm {} at {}", alarm.id, alarm.time)?;
    Ok(alarm)
}

pub async fn delete(store: &mut AlarmStore, id: AlarmId, out: &mut dyn Write) -> Result<()> {
    if !store.delete(id).await? {
        bail!("No alarm with id {id}");
    }
    writeln!(out, "Deleted alarm {id}")?;
    Ok(())
}

pub async fn set_enabled(
    store: &mut AlarmStore,
    id: AlarmId,
    enabled: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if !store.set_enabled(id, enabled).await? {
        bail!("No alarm with id {id}");
    }
    let state = if enabled { "enabled" } else { "disabled" };
    writeln!(out, "Alarm {id} {state}")?;
    Ok(())
}

pub async fn set_time(
    store: &mut AlarmStore,
    id: AlarmId,
    time: AlarmTime,
    out: &mut dyn Write,
) -> Result<()> {
    if !store.set_time(id, time).await? {
        bail!("No alarm with id {id}");
    }
    writeln!(out, "Alarm {id} now rings at {time}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gently_store::MemoryKvStore;

    fn time(s: &str) -> AlarmTime {
        s.parse().unwrap()
    }

    fn id(n: u32) -> AlarmId {
        AlarmId::new(n).unwrap()
    }

    async fn store() -> AlarmStore {
        AlarmStore::open(MemoryKvStore::new()).await
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_list_table() {
        let mut store = store().await;
        let mut sink = Vec::new();
        add(&mut store, time("07:00:00"), true, &mut sink).await.unwrap();
        add(&mut store, time("21:30:00"), false, &mut sink).await.unwrap();

        let mut out = Vec::new();
        list(&store, false, &mut out).unwrap();
        assert_eq!(
            text(out),
            "  ID  TIME      STATE\n   1  07:00:00  on\n   2  21:30:00  off\n"
        );
    }

    #[tokio::test]
    async fn test_list_json_matches_storage_shape() {
        let mut store = store().await;
        add(&mut store, time("07:00:00"), true, &mut Vec::new()).await.unwrap();

        let mut out = Vec::new();
        list(&store, true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "id": 1, "time": "07:00:00", "enabled": true }])
        );
    }

    #[tokio::test]
    async fn test_empty_list() {
        let mut out = Vec::new();
        list(&store().await, false, &mut out).unwrap();
        assert_eq!(text(out), "No alarms\n");
    }

    #[tokio::test]
    async fn test_edits_report_and_unknown_ids_fail() {
        let mut store = store().await;
        add(&mut store, time("07:00:00"), true, &mut Vec::new()).await.unwrap();

        let mut out = Vec::new();
        set_enabled(&mut store, id(1), false, &mut out).await.unwrap();
        set_time(&mut store, id(1), time("08:15:00"), &mut out).await.unwrap();
        delete(&mut store, id(1), &mut out).await.unwrap();
        assert_eq!(
            text(out),
            "Alarm 1 disabled\nAlarm 1 now rings at 08:15:00\nDeleted alarm 1\n"
        );

        let err = delete(&mut store, id(1), &mut Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "No alarm with id 1");
        assert!(set_enabled(&mut store, id(9), true, &mut Vec::new()).await.is_err());
        assert!(set_time(&mut store, id(9), time("09:00:00"), &mut Vec::new()).await.is_err());
    }
}
