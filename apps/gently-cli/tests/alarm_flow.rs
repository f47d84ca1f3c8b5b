//! Command sequences against a real SQLite file, reopened between steps
//! the way separate `gently` invocations would.

use gently_cli::commands::{alarms, device};
use gently_cli::context::AppContext;
use gently_core::{AlarmId, AlarmTime};
use gently_sync::GentlyConfig;
use tempfile::TempDir;

fn time(s: &str) -> AlarmTime {
    s.parse().unwrap()
}

fn id(n: u32) -> AlarmId {
    AlarmId::new(n).unwrap()
}

#[tokio::test]
async fn freed_ids_are_reused_across_invocations() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::with_config(GentlyConfig::default(), Some(dir.path().join("gently.db")));

    // gently add 07:00:00 ; gently add 07:30:00 --disabled
    {
        let (db, mut store) = ctx.open_store().await.unwrap();
        alarms::add(&mut store, time("07:00:00"), true, &mut Vec::new()).await.unwrap();
        alarms::add(&mut store, time("07:30:00"), false, &mut Vec::new()).await.unwrap();
        db.close().await;
    }

    // gently delete 1
    {
        let (db, mut store) = ctx.open_store().await.unwrap();
        alarms::delete(&mut store, id(1), &mut Vec::new()).await.unwrap();
        db.close().await;
    }

    // gently add 22:00:00
    {
        let (db, mut store) = ctx.open_store().await.unwrap();
        let added = alarms::add(&mut store, time("22:00:00"), true, &mut Vec::new())
            .await
            .unwrap();
        assert_eq!(added.id, id(1));
        db.close().await;
    }

    // gently push --dry-run
    let (_db, store) = ctx.open_store().await.unwrap();
    let mut out = Vec::new();
    device::dry_run(store.list(), &mut out).unwrap();
    let lines: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("2,07:30:00,0"));
    assert!(lines[1].ends_with("1,22:00:00,1"));
}

#[tokio::test]
async fn unknown_id_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::with_config(GentlyConfig::default(), Some(dir.path().join("gently.db")));

    let (db, mut store) = ctx.open_store().await.unwrap();
    alarms::add(&mut store, time("06:00:00"), true, &mut Vec::new()).await.unwrap();
    assert!(alarms::set_enabled(&mut store, id(5), false, &mut Vec::new())
        .await
        .is_err());
    db.close().await;

    let (_db, store) = ctx.open_store().await.unwrap();
    let mut out = Vec::new();
    alarms::list(&store, false, &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("   1  06:00:00  on"));
}
