//! # gently
//!
//! Entry point: parse arguments, start logging, run the command.
//!
//! ```text
//! gently add 07:00:00          # local list only
//! gently push                  # scan, connect, write every alarm
//! gently push --dry-run        # show the payloads instead
//! RUST_LOG=gently=trace gently -v push
//! ```

use std::process::ExitCode;

use clap::Parser;
use gently_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    gently_cli::init_tracing(cli.verbose);

    match gently_cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
