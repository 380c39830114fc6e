//! Ports the engine depends on. Adapters live outside this crate.

use async_trait::async_trait;

use super::sync_model::{
    BatchResult, FieldDefinition, FieldNameMap, PageRequest, PageResponse, RawIssue, SyncMode,
    SyncPhase, SyncResult,
};
use crate::errors::Result;

/// Read side: the remote ticketing API.
#[async_trait]
pub trait IssueSourceTrait: Send + Sync {
    /// Fetch one bounded page of issues matching `request.query`.
    async fn search(&self, request: &PageRequest) -> Result<PageResponse>;

    /// Fetch the full field catalog.
    async fn list_fields(&self) -> Result<Vec<FieldDefinition>>;
}

/// Write side: the idempotent upsert endpoint of the persistent store.
#[async_trait]
pub trait IssueStoreTrait: Send + Sync {
    /// Upsert one batch. `Ok` with `success: false` is a store-side rejection.
    async fn upsert(&self, issues: &[RawIssue], field_names: &FieldNameMap)
        -> Result<BatchResult>;
}

/// Progress surface for UI or logs. Every method defaults to a no-op.
pub trait SyncProgressReporter: Send + Sync {
    fn on_phase(&self, _phase: SyncPhase) {}

    fn on_fetch_progress(&self, _fetched: usize, _total: usize) {}

    fn on_batch_progress(&self, _completed: usize, _total_batches: usize) {}

    fn on_complete(&self, _result: &SyncResult) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgressReporter;

impl SyncProgressReporter for NoOpProgressReporter {}

/// Caller-side confirmation hook consulted before manual runs.
#[async_trait]
pub trait SyncConfirmer: Send + Sync {
    async fn confirm(&self, mode: SyncMode, prompt: &str) -> bool;
}

/// Confirmer that accepts every run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait]
impl SyncConfirmer for AlwaysConfirm {
    async fn confirm(&self, _mode: SyncMode, _prompt: &str) -> bool {
        true
    }
}
