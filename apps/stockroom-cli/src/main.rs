//! # Stockroom CLI
//!
//! Command-line front end for the inventory and sales tracker.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockroom <command>                              │
//! │                                                                         │
//! │  Cli::parse() ──► AppConfig::load() ──► Database::new(..)              │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                   commands::dispatch(..)               │
//! │                                     │                 │                 │
//! │                                  Ok(json)        Err(ApiError)         │
//! │                                     │                 │                 │
//! │                                  stdout      stderr + exit 1/2/3/4     │
//! │                                                                         │
//! │  Logs (tracing) always go to stderr so stdout stays machine-readable.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money is read and printed in decimal form (`12.50`); it is stored as
//! integer minor units.
//!
//! ## Environment
//! - `STOCKROOM_DB_PATH` - database file (default `./stockroom.db`)
//! - `STOCKROOM_MAX_CONNECTIONS` - pool size (default 5)
//! - `STOCKROOM_BUSY_TIMEOUT_SECS` - write-lock wait (default 5)
//! - `RUST_LOG` - log filter (default `info,stockroom=debug,sqlx=warn`)

mod cli;
mod commands;
mod config;
mod error;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::AppConfig;
use stockroom_db::Database;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %format!("{err:#}"), "Startup failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Opens the database, runs one command and prints its outcome.
///
/// `Err` is reserved for failures before or around the command (config,
/// connection, output); command failures come back as an exit code.
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load()
        .context("loading configuration")?
        .with_db_path(cli.db);

    info!(path = %config.db_path.display(), "Opening database");

    let db = Database::new(config.db_config())
        .await
        .with_context(|| format!("opening database {}", config.db_path.display()))?;

    let outcome = commands::dispatch(&db, cli.command).await;
    db.close().await;

    match outcome {
        Ok(response) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&response).context("rendering response")?
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(api_error) => {
            eprintln!(
                "{}",
                serde_json::to_string(&api_error).context("rendering error")?
            );
            Ok(ExitCode::from(api_error.exit_code()))
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom_db=trace` - Trace the database layer only
/// - Default: INFO, DEBUG for stockroom crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
