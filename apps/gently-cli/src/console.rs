//! Terminal rendering of session progress.
//!
//! ```text
//! Scanning for devices...
//! Connecting to device...
//! Retrieving services...
//! [  0%] Sending 2 alarm(s)...
//! [ 50%] Sending alarm 1 of 2...
//! [100%] Sending alarm 2 of 2...
//! Alarms sent to the device!
//! ```

use std::io::{self, Write};
use std::sync::Mutex;

use gently_sync::{SyncErrorKind, SyncEventEmitter, SyncPhase, SyncReport};

/// Writes one line per session event.
pub struct ConsoleEmitter<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleEmitter<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleEmitter::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleEmitter<W> {
    pub fn new(out: W) -> Self {
        ConsoleEmitter {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn line(&self, text: std::fmt::Arguments<'_>) {
        if let Ok(mut out) = self.out.lock() {
            // Progress output is best effort.
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }
}

impl<W: Write + Send> SyncEventEmitter for ConsoleEmitter<W> {
    fn on_phase_change(&self, phase: SyncPhase, message: &str, progress: Option<f32>) {
        match (phase, progress) {
            (SyncPhase::Transmitting, Some(p)) => {
                let percent = (p * 100.0).round() as u32;
                self.line(format_args!("[{percent:>3}%] {message}"));
            }
            _ if phase.is_active() || phase == SyncPhase::Succeeded => {
                self.line(format_args!("{message}"));
            }
            // on_failure prints the error line.
            _ => {}
        }
    }

    fn on_success(&self, report: &SyncReport) {
        self.line(format_args!(
            "{} of {} written to {}",
            report.written, report.total, report.device_id
        ));
    }

    fn on_failure(&self, kind: SyncErrorKind, detail: &str) {
        self.line(format_args!("Sync failed ({kind}): {detail}"));
    }
}
