//! # gently-cli
//!
//! Command-line front end: edits the local alarm list and pushes it to the
//! GentlyDevice.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         gently <command>                                │
//! │                                                                         │
//! │  1. Parse arguments (clap) ───────────────────────────────────────────► │
//! │                                                                         │
//! │  2. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber on stderr with env filter                      │
//! │     • Default: warn; -v: info,gently=debug,sqlx=warn; RUST_LOG wins     │
//! │                                                                         │
//! │  3. Load Configuration ───────────────────────────────────────────────► │
//! │     • gently.toml, then GENTLY_* environment overrides                  │
//! │                                                                         │
//! │  4. Open Alarm Database (alarm and device commands) ──────────────────► │
//! │     • SQLite with WAL mode, pending migrations applied                  │
//! │                                                                         │
//! │  5. Dispatch ─────────────────────────────────────────────────────────► │
//! │     • commands::alarms / commands::device / commands::config            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod console;
pub mod context;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use gently_store::AlarmStore;
use gently_sync::SyncEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ConfigCommand};
use crate::console::ConsoleEmitter;
use crate::context::AppContext;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - Default: `warn`
/// - `-v`: `info,gently=debug,sqlx=warn`
/// - `RUST_LOG` overrides both
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,gently=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs one parsed command to completion.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = AppContext::load(cli.config, cli.db)?;

    match cli.command {
        Command::Config(sub) => {
            run_config(&ctx, sub)?;
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let (db, mut store) = ctx.open_store().await?;
            let code = run_with_store(&ctx, &mut store, command).await?;
            db.close().await;
            info!("Done");
            Ok(code)
        }
    }
}

fn run_config(ctx: &AppContext, sub: ConfigCommand) -> Result<()> {
    let mut out = io::stdout().lock();
    match sub {
        ConfigCommand::Show => commands::config::show(&ctx.config, &mut out),
        ConfigCommand::Init { force } => {
            commands::config::init(ctx.config_path.clone(), force, &mut out).map(|_| ())
        }
    }
}

async fn run_with_store(ctx: &AppContext, store: &mut AlarmStore, command: Command) -> Result<ExitCode> {
    let mut out = io::stdout();

    match command {
        Command::List { json } => commands::alarms::list(store, json, &mut out)?,
        Command::Add { time, disabled } => {
            commands::alarms::add(store, time, !disabled, &mut out).await?;
        }
        Command::Delete { id } => commands::alarms::delete(store, id, &mut out).await?,
        Command::Enable { id } => commands::alarms::set_enabled(store, id, true, &mut out).await?,
        Command::Disable { id } => {
            commands::alarms::set_enabled(store, id, false, &mut out).await?;
        }
        Command::SetTime { id, time } => {
            commands::alarms::set_time(store, id, time, &mut out).await?;
        }
        Command::Push { dry_run: true } => commands::device::dry_run(store.list(), &mut out)?,
        Command::Push { dry_run: false } => {
            let engine = open_console_engine(ctx).await?;
            return Ok(commands::device::push(&engine, store.list()).await);
        }
        Command::Forget { ids } => {
            let engine = open_console_engine(ctx).await?;
            return Ok(commands::device::forget(&engine, &ids).await);
        }
        Command::Config(sub) => run_config(ctx, sub)?,
    }

    Ok(ExitCode::SUCCESS)
}

async fn open_console_engine(ctx: &AppContext) -> Result<SyncEngine> {
    commands::device::open_engine(&ctx.config, Arc::new(ConsoleEmitter::stdout())).await
}
