//! Argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gently_core::{AlarmId, AlarmTime};

/// Manage Gently alarms and push them to the GentlyDevice.
#[derive(Debug, Parser)]
#[command(name = "gently", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Alarm database (overrides config and GENTLY_DB_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Log engine and storage activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every alarm in order.
    List {
        /// Print the stored JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Add an alarm with the smallest free id.
    Add {
        /// Time of day, HH:MM:SS.
        time: AlarmTime,

        /// Store the alarm switched off.
        #[arg(long)]
        disabled: bool,
    },

    /// Remove an alarm from the local list.
    Delete { id: AlarmId },

    /// Switch an alarm on.
    Enable { id: AlarmId },

    /// Switch an alarm off.
    Disable { id: AlarmId },

    /// Change an alarm's time.
    SetTime { id: AlarmId, time: AlarmTime },

    /// Send the full alarm list to the device.
    Push {
        /// Print the payloads without using Bluetooth.
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask the device to drop the given alarm ids.
    Forget {
        #[arg(required = true)]
        ids: Vec<AlarmId>,
    },

    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,

    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
