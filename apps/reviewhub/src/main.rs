//! # Reviewhub
//!
//! Command-line client: browse, search and sort reviews, and (against a live
//! endpoint) write reviews and comments.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use reviewhub_core::service::ViewScope;

mod cli;
mod commands;
mod config;
mod error;
mod render;
mod state;
mod telemetry;

use cli::Cli;
use commands::Output;
use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

/// Conventional exit status after SIGINT.
const INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().with_overrides(&cli);
    tracing::debug!(mode = %config.mode, session_dir = %config.session_dir.display(), "Configuration loaded");

    let state = match AppState::new(&config).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("reviewhub: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let output = if cli.json { Output::Json } else { Output::Text };

    // Ctrl-C abandons the running command; late results are dropped.
    let scope = Arc::new(ViewScope::new());
    let watcher = {
        let scope = scope.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted");
                scope.leave();
            }
        })
    };

    let outcome = scope.run(commands::run(cli.command, &state, output)).await;
    watcher.abort();

    match outcome {
        Some(Ok(())) => ExitCode::SUCCESS,
        Some(Err(err)) => {
            eprintln!("{}", err.notice());
            err.exit_code()
        }
        None => ExitCode::from(INTERRUPTED),
    }
}
