//! Caller-owned entry point that guards and triggers sync runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono_tz::Tz;
use log::{debug, info};
use tokio::sync::Mutex;

use super::orchestrator::SyncSession;
use super::sync_model::{SyncMode, SyncOptions, SyncResult, SyncStatus};
use super::sync_traits::{
    AlwaysConfirm, IssueSourceTrait, IssueStoreTrait, NoOpProgressReporter, SyncConfirmer,
    SyncProgressReporter,
};

/// Confirmation text shown before a manual run.
pub fn confirmation_prompt(mode: SyncMode) -> String {
    match mode {
        SyncMode::Debug => "Test sync with 10 most recent issues?\n\n\
             This will fetch a small dataset for testing purposes."
            .to_string(),
        SyncMode::Full | SyncMode::Delta => format!(
            "Sync {} tickets?\n\n\
             This will fetch the data directly from the ticketing API.\n\n\
             Note: This may take a few minutes for large datasets (3000+ issues).",
            if mode == SyncMode::Full {
                "all"
            } else {
                "new/updated"
            }
        ),
    }
}

/// Long-lived handle owned by the caller (UI, CLI, scheduler).
///
/// Holds the only state that outlives a run: the in-flight guard and the
/// "already auto-synced" flag. Each accepted trigger runs a fresh [`SyncSession`].
pub struct SyncRunner {
    project_key: String,
    tracker_tz: Tz,
    source: Arc<dyn IssueSourceTrait>,
    store: Arc<dyn IssueStoreTrait>,
    reporter: Arc<dyn SyncProgressReporter>,
    confirmer: Arc<dyn SyncConfirmer>,
    in_flight: Mutex<()>,
    auto_synced: AtomicBool,
}

impl SyncRunner {
    pub fn new(
        project_key: impl Into<String>,
        source: Arc<dyn IssueSourceTrait>,
        store: Arc<dyn IssueStoreTrait>,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            tracker_tz: Tz::UTC,
            source,
            store,
            reporter: Arc::new(NoOpProgressReporter),
            confirmer: Arc::new(AlwaysConfirm),
            in_flight: Mutex::new(()),
            auto_synced: AtomicBool::new(false),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn SyncProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_tracker_timezone(mut self, tracker_tz: Tz) -> Self {
        self.tracker_tz = tracker_tz;
        self
    }

    pub fn with_confirmer(mut self, confirmer: Arc<dyn SyncConfirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Trigger a run. Manual runs ask the confirmer first; a run already in
    /// flight causes an immediate `AlreadyRunning` result.
    pub async fn run_sync(&self, mode: SyncMode, options: SyncOptions) -> SyncResult {
        let Ok(_guard) = self.in_flight.try_lock() else {
            info!(
                "[TicketSync] Rejecting {} sync: another run is in progress",
                mode
            );
            let result = SyncResult::already_running(mode);
            self.reporter.on_complete(&result);
            return result;
        };

        if !options.auto_sync
            && !self
                .confirmer
                .confirm(mode, &confirmation_prompt(mode))
                .await
        {
            info!("[TicketSync] {} sync cancelled by user", mode);
            let result = SyncResult::declined(mode);
            self.reporter.on_complete(&result);
            return result;
        }

        SyncSession::new(
            self.project_key.clone(),
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            Arc::clone(&self.reporter),
        )
        .with_tracker_timezone(self.tracker_tz)
        .run(mode, options)
        .await
    }

    /// Auto-sync at most once per runner. Returns `None` when already done.
    ///
    /// An attempt rejected as `AlreadyRunning` does not count; the next call tries again.
    pub async fn run_auto_sync_once(&self, mode: SyncMode) -> Option<SyncResult> {
        if self.auto_synced.swap(true, Ordering::SeqCst) {
            debug!("[TicketSync] Auto-sync already ran for this session");
            return None;
        }
        let result = self.run_sync(mode, SyncOptions::auto()).await;
        if result.status == SyncStatus::AlreadyRunning {
            self.auto_synced.store(false, Ordering::SeqCst);
        }
        Some(result)
    }
}
