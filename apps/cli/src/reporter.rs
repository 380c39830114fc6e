//! Terminal-side progress reporting and confirmation.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use ticketsync_core::sync::{SyncConfirmer, SyncMode, SyncPhase, SyncProgressReporter, SyncResult};
use tracing::{debug, info};

/// Emits progress as tracing events.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl SyncProgressReporter for TracingReporter {
    fn on_phase(&self, phase: SyncPhase) {
        debug!(?phase, "phase changed");
    }

    fn on_fetch_progress(&self, fetched: usize, total: usize) {
        info!("Fetched {}/{} issues", fetched, total);
    }

    fn on_batch_progress(&self, completed: usize, total_batches: usize) {
        info!("Processed batch {}/{}", completed, total_batches);
    }

    fn on_complete(&self, result: &SyncResult) {
        debug!(run_id = %result.run_id, status = ?result.status, "run finished");
    }
}

/// Asks on stdin; anything other than `y`/`yes` declines.
#[derive(Debug, Default)]
pub struct StdinConfirmer;

#[async_trait]
impl SyncConfirmer for StdinConfirmer {
    async fn confirm(&self, _mode: SyncMode, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            let mut stderr = io::stderr();
            let _ = write!(stderr, "{} [y/N] ", prompt);
            let _ = stderr.flush();
            let mut answer = String::new();
            match io::stdin().lock().read_line(&mut answer) {
                Ok(_) => is_affirmative(&answer),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false)
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
