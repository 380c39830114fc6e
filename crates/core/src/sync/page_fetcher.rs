//! Sequential pagination over the search endpoint.

use std::sync::Arc;

use log::{debug, warn};

use super::sync_constants::{MAX_CONSECUTIVE_EMPTY_PAGES, MAX_FETCH_OFFSET};
use super::sync_model::{PageRequest, RawIssue, SyncMode};
use super::sync_traits::{IssueSourceTrait, SyncProgressReporter};
use crate::errors::{Result, SyncError};

/// Issues collected by one fetch loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub issues: Vec<RawIssue>,
    /// `totalMatching` reported by the last page.
    pub total_matching: usize,
    /// The offset ceiling stopped the loop before the total was reached.
    pub truncated: bool,
    pub pages: usize,
}

/// Requests pages in strict offset order until exhaustion, the ceiling, or the debug page.
pub struct PageFetcher {
    source: Arc<dyn IssueSourceTrait>,
    reporter: Arc<dyn SyncProgressReporter>,
    run_id: String,
}

impl PageFetcher {
    pub fn new(
        source: Arc<dyn IssueSourceTrait>,
        reporter: Arc<dyn SyncProgressReporter>,
    ) -> Self {
        Self {
            source,
            reporter,
            run_id: "-".to_string(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Fetch every page for `query`.
    ///
    /// Termination, in priority order:
    /// 1. `debug` mode stops after one page.
    /// 2. The next offset passing `MAX_FETCH_OFFSET` stops with what was collected.
    /// 3. The accumulated count reaching the latest `totalMatching` stops normally.
    ///
    /// Two consecutive empty pages short of the total fail with `FetchAnomaly`.
    /// Any transport error aborts the whole fetch; nothing collected is returned.
    pub async fn fetch_all_pages(&self, query: &str, mode: SyncMode) -> Result<FetchOutcome> {
        let page_size = mode.page_size();
        let mut outcome = FetchOutcome::default();
        let mut offset = 0usize;
        let mut consecutive_empty = 0usize;

        loop {
            let request = PageRequest {
                query: query.to_string(),
                offset,
                limit: page_size,
            };
            let page = self.source.search(&request).await?;
            let received = page.issues.len();

            outcome.pages += 1;
            outcome.total_matching = page.total_matching;
            outcome.issues.extend(page.issues);
            debug!(
                "[TicketSync] run={} Page at offset {} returned {} issues ({} / {})",
                self.run_id,
                offset,
                received,
                outcome.issues.len(),
                outcome.total_matching
            );
            self.reporter
                .on_fetch_progress(outcome.issues.len(), outcome.total_matching);

            offset += page_size;

            if mode.is_single_page() {
                break;
            }

            if offset > MAX_FETCH_OFFSET {
                if outcome.issues.len() < outcome.total_matching {
                    warn!(
                        "[TicketSync] run={} Reached the {} record pagination ceiling; {} of {} issues fetched",
                        self.run_id,
                        MAX_FETCH_OFFSET,
                        outcome.issues.len(),
                        outcome.total_matching
                    );
                    outcome.truncated = true;
                }
                break;
            }

            if outcome.issues.len() >= outcome.total_matching {
                break;
            }

            if received == 0 {
                consecutive_empty += 1;
                if consecutive_empty >= MAX_CONSECUTIVE_EMPTY_PAGES {
                    return Err(SyncError::FetchAnomaly(format!(
                        "{} consecutive empty pages at offset {} with {} of {} issues fetched",
                        consecutive_empty,
                        offset - page_size,
                        outcome.issues.len(),
                        outcome.total_matching
                    )));
                }
            } else {
                consecutive_empty = 0;
            }
        }

        Ok(outcome)
    }
}
