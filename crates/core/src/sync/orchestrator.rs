//! Per-run sync state machine.
//!
//! `Idle -> FetchingMetadata -> FetchingPages -> DeliveringBatches -> Completed | Failed`.
//! An empty fetch goes straight from `FetchingPages` to `Completed`.

use std::sync::Arc;
use std::time::Instant;

use chrono_tz::Tz;
use log::{debug, info, warn};
use uuid::Uuid;

use super::batch_dispatcher::BatchDispatcher;
use super::field_resolver::FieldMetadataResolver;
use super::page_fetcher::PageFetcher;
use super::query_builder::build_query_in;
use super::sync_model::{SyncMode, SyncOptions, SyncPhase, SyncResult, SyncStatus};
use super::sync_traits::{IssueSourceTrait, IssueStoreTrait, SyncProgressReporter};

/// One sync run. Built fresh per trigger and consumed by [`SyncSession::run`].
pub struct SyncSession {
    run_id: String,
    project_key: String,
    tracker_tz: Tz,
    phase: SyncPhase,
    source: Arc<dyn IssueSourceTrait>,
    store: Arc<dyn IssueStoreTrait>,
    reporter: Arc<dyn SyncProgressReporter>,
}

impl SyncSession {
    pub fn new(
        project_key: impl Into<String>,
        source: Arc<dyn IssueSourceTrait>,
        store: Arc<dyn IssueStoreTrait>,
        reporter: Arc<dyn SyncProgressReporter>,
    ) -> Self {
        Self {
            run_id: Uuid::now_v7().to_string(),
            project_key: project_key.into(),
            tracker_tz: Tz::UTC,
            phase: SyncPhase::Idle,
            source,
            store,
            reporter,
        }
    }

    /// Timezone the tracker uses to read the delta boundary. Defaults to UTC.
    pub fn with_tracker_timezone(mut self, tracker_tz: Tz) -> Self {
        self.tracker_tz = tracker_tz;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Drive the run to a terminal state. Every failure is folded into the
    /// returned result; the terminal result is reported exactly once.
    pub async fn run(mut self, mode: SyncMode, options: SyncOptions) -> SyncResult {
        let started_at = Instant::now();
        let mut result = SyncResult {
            run_id: self.run_id.clone(),
            ..SyncResult::empty(mode, SyncStatus::Completed)
        };
        info!(
            "[TicketSync] run={} Starting {} sync for project {} (auto_sync={})",
            self.run_id, mode, self.project_key, options.auto_sync
        );

        self.transition(SyncPhase::FetchingMetadata);
        let field_names = FieldMetadataResolver::new(Arc::clone(&self.source))
            .with_run_id(self.run_id.as_str())
            .resolve_field_names()
            .await;
        result.metadata_degraded = field_names.is_empty();

        self.transition(SyncPhase::FetchingPages);
        let query = build_query_in(mode, &self.project_key, self.tracker_tz);
        debug!("[TicketSync] run={} Query: {}", self.run_id, query);
        let fetcher = PageFetcher::new(Arc::clone(&self.source), Arc::clone(&self.reporter))
            .with_run_id(self.run_id.as_str());
        let fetched = match fetcher.fetch_all_pages(&query, mode).await {
            Ok(outcome) => outcome,
            Err(err) => {
                result.fail_with(&err);
                return self.finish(result, started_at);
            }
        };
        result.truncated = fetched.truncated;

        if fetched.issues.is_empty() {
            result.status = SyncStatus::NoMatchingRecords;
            return self.finish(result, started_at);
        }

        self.transition(SyncPhase::DeliveringBatches);
        let dispatcher = BatchDispatcher::new(Arc::clone(&self.store), Arc::clone(&self.reporter))
            .with_run_id(self.run_id.as_str());
        let delivery = dispatcher.deliver(&fetched.issues, &field_names).await;
        result.total_issues = delivery.total_issues;
        result.total_inserted = delivery.inserted;
        result.total_updated = delivery.updated;
        result.batches_completed = delivery.batches_completed;
        result.batches_total = delivery.batches_total;
        if let Some(err) = &delivery.error {
            result.fail_with(err);
        }

        self.finish(result, started_at)
    }

    fn transition(&mut self, next: SyncPhase) {
        debug!(
            "[TicketSync] run={} {:?} -> {:?}",
            self.run_id, self.phase, next
        );
        self.phase = next;
        self.reporter.on_phase(next);
    }

    fn finish(mut self, mut result: SyncResult, started_at: Instant) -> SyncResult {
        result.duration_ms = started_at.elapsed().as_millis() as i64;
        if result.failed {
            self.transition(SyncPhase::Failed);
            warn!("[TicketSync] run={} {}", self.run_id, result.summary());
        } else {
            self.transition(SyncPhase::Completed);
            info!("[TicketSync] run={} {}", self.run_id, result.summary());
        }
        self.reporter.on_complete(&result);
        result
    }
}
