//! Sequential batch delivery to the store.

use std::sync::Arc;

use log::{debug, warn};

use super::sync_constants::BATCH_SIZE;
use super::sync_model::{FieldNameMap, RawIssue};
use super::sync_traits::{IssueStoreTrait, SyncProgressReporter};
use crate::errors::SyncError;

/// Per-run delivery totals. `error` is set when delivery stopped early.
#[derive(Debug, Default)]
pub struct DeliveryOutcome {
    pub total_issues: usize,
    pub inserted: usize,
    pub updated: usize,
    pub batches_completed: usize,
    pub batches_total: usize,
    pub error: Option<SyncError>,
}

impl DeliveryOutcome {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Splits issues into `BATCH_SIZE` chunks and upserts them one at a time.
pub struct BatchDispatcher {
    store: Arc<dyn IssueStoreTrait>,
    reporter: Arc<dyn SyncProgressReporter>,
    run_id: String,
}

impl BatchDispatcher {
    pub fn new(store: Arc<dyn IssueStoreTrait>, reporter: Arc<dyn SyncProgressReporter>) -> Self {
        Self {
            store,
            reporter,
            run_id: "-".to_string(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Deliver `issues` in fetch order.
    ///
    /// The first rejected or failed batch stops delivery; later batches are never
    /// sent and earlier ones are not rolled back.
    pub async fn deliver(&self, issues: &[RawIssue], field_names: &FieldNameMap) -> DeliveryOutcome {
        let mut outcome = DeliveryOutcome {
            total_issues: issues.len(),
            batches_total: issues.len().div_ceil(BATCH_SIZE),
            ..DeliveryOutcome::default()
        };

        for (index, chunk) in issues.chunks(BATCH_SIZE).enumerate() {
            let batch_number = index + 1;
            let error = match self.store.upsert(chunk, field_names).await {
                Ok(result) if result.success => {
                    outcome.inserted += result.inserted;
                    outcome.updated += result.updated;
                    outcome.batches_completed = batch_number;
                    debug!(
                        "[TicketSync] run={} Batch {}/{} stored: {} inserted, {} updated",
                        self.run_id,
                        batch_number, outcome.batches_total, result.inserted, result.updated
                    );
                    self.reporter
                        .on_batch_progress(batch_number, outcome.batches_total);
                    continue;
                }
                Ok(result) => SyncError::BatchRejected(
                    result
                        .error_message
                        .filter(|message| !message.trim().is_empty())
                        .unwrap_or_else(|| "Unknown error".to_string()),
                ),
                Err(err) => err,
            };

            warn!(
                "[TicketSync] run={} Batch {}/{} failed, stopping delivery after {} completed batches: {}",
                self.run_id,
                batch_number, outcome.batches_total, outcome.batches_completed, error
            );
            outcome.error = Some(error);
            break;
        }

        outcome
    }
}
