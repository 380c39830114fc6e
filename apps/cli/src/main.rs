//! `ticketsync`: pull issues from the ticketing API into the store.

mod config;
mod reporter;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use ticketsync_client::{StoreClient, TrackerClient};
use ticketsync_core::sync::{SyncMode, SyncOptions, SyncResult, SyncRunner};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::reporter::{StdinConfirmer, TracingReporter};

#[derive(Debug, Parser)]
#[command(name = "ticketsync", version, about = "Sync tickets into the issue store")]
struct Cli {
    /// Sync mode: full (alias: all), delta, or debug (alias: test)
    mode: SyncMode,

    /// Skip the confirmation prompt
    #[arg(long)]
    auto: bool,

    /// Whole-run retries for retryable failures
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_runner(config: &AppConfig) -> Result<SyncRunner> {
    let mut tracker = TrackerClient::with_timeout(&config.tracker_url, config.timeout)
        .context("Failed to build ticketing API client")?;
    if let Some(token) = &config.tracker_token {
        tracker = tracker.with_token(token.clone());
    }
    let mut store = StoreClient::with_timeout(&config.store_url, config.timeout)
        .context("Failed to build store client")?;
    if let Some(token) = &config.store_token {
        store = store.with_token(token.clone());
    }

    Ok(
        SyncRunner::new(&config.project_key, Arc::new(tracker), Arc::new(store))
            .with_tracker_timezone(config.tracker_tz)
            .with_reporter(Arc::new(TracingReporter))
            .with_confirmer(Arc::new(StdinConfirmer)),
    )
}

/// Delay before whole-run retry number `attempt + 1`.
///
/// Starts at 30s and doubles up to 10 minutes, plus up to 20% jitter.
fn retry_delay(attempt: u32) -> Duration {
    const FIRST_RETRY_SECS: u64 = 30;
    const MAX_RETRY_SECS: u64 = 600;

    let base_secs = FIRST_RETRY_SECS
        .saturating_mul(1_u64 << attempt.min(16))
        .min(MAX_RETRY_SECS);
    let base_ms = base_secs * 1000;
    let jitter = rand::thread_rng().gen_range(0..=base_ms / 5);
    Duration::from_millis(base_ms + jitter)
}

async fn run(cli: Cli) -> Result<SyncResult> {
    let config = AppConfig::from_env()?;
    info!(
        "Syncing project {} from {} ({} mode)",
        config.project_key, config.tracker_url, cli.mode
    );
    let runner = build_runner(&config)?;

    let mut options = SyncOptions { auto_sync: cli.auto };
    let mut attempt = 0;
    loop {
        let result = runner.run_sync(cli.mode, options).await;
        if !result.failed || !result.retryable || attempt >= cli.retries {
            return Ok(result);
        }

        let delay = retry_delay(attempt);
        attempt += 1;
        warn!(
            "Run {} failed ({}); retry {}/{} in {:?}",
            result.run_id,
            result.failure_message.as_deref().unwrap_or("unknown error"),
            attempt,
            cli.retries,
            delay
        );
        tokio::time::sleep(delay).await;
        // Already confirmed once.
        options = SyncOptions::auto();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();
    let json = cli.json;

    let result = match run(cli).await {
        Ok(result) => result,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                error!("Failed to encode result: {}", e);
                return ExitCode::from(2);
            }
        }
    } else {
        println!("{}", result.summary());
    }

    if result.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
