//! Assistkit: deterministic generator for AI coding assistant configuration.
//!
//! This is the main entry point for the `assistkit` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and maps
//! errors to exit codes.

mod artifact;
mod capability;
mod cli;
mod commands;
pub mod config;
pub mod connector;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
mod generate;
mod profile;
mod template;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding a log filter directive (e.g. `assistkit=debug`).
const LOG_ENV: &str = "ASSISTKIT_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
