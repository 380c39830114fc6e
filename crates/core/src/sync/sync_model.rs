//! Ticket sync domain models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sync_constants::{DEBUG_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use crate::errors::SyncError;

/// Which records a run retrieves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Every record of the project.
    Full,
    /// Records created or updated within the trailing window.
    Delta,
    /// One small page, for verifying connectivity.
    Debug,
}

impl SyncMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Delta => "delta",
            Self::Debug => "debug",
        }
    }

    pub fn page_size(self) -> usize {
        match self {
            Self::Debug => DEBUG_PAGE_SIZE,
            Self::Full | Self::Delta => DEFAULT_PAGE_SIZE,
        }
    }

    pub fn is_single_page(self) -> bool {
        matches!(self, Self::Debug)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "all" => Ok(Self::Full),
            "delta" => Ok(Self::Delta),
            "debug" | "test" => Ok(Self::Debug),
            other => Err(SyncError::invalid_request(format!(
                "Unknown sync mode '{}' (expected full, delta or debug)",
                other
            ))),
        }
    }
}

/// Options supplied with a sync trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOptions {
    /// Skip the caller's confirmation step.
    pub auto_sync: bool,
}

impl SyncOptions {
    pub fn auto() -> Self {
        Self { auto_sync: true }
    }
}

/// One entry of the remote field catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
}

/// Field identifier -> display name, built once per run.
///
/// An empty map is valid: custom fields are then delivered unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldNameMap(BTreeMap<String, String>);

impl FieldNameMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from catalog entries. Later duplicates of an id win.
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = FieldDefinition>,
    {
        Self(
            definitions
                .into_iter()
                .map(|definition| (definition.id, definition.name))
                .collect(),
        )
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    /// Display name for `field_id`, or the id itself when unknown.
    pub fn display_name<'a>(&'a self, field_id: &'a str) -> &'a str {
        self.get(field_id).unwrap_or(field_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An issue as returned by the remote API: a stable id plus an opaque field bag.
///
/// The engine never looks inside `fields`; it is forwarded to the store as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIssue {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RawIssue {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: serde_json::Map::new(),
        }
    }
}

/// One bounded search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub query: String,
    pub offset: usize,
    pub limit: usize,
}

/// One page of search results.
///
/// `total_matching` reflects live data and may differ from page to page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub issues: Vec<RawIssue>,
    pub total_matching: usize,
}

/// Store outcome for a single batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success: bool,
    pub inserted: usize,
    pub updated: usize,
    pub error_message: Option<String>,
}

impl BatchResult {
    pub fn ok(inserted: usize, updated: usize) -> Self {
        Self {
            success: true,
            inserted,
            updated,
            error_message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            inserted: 0,
            updated: 0,
            error_message: Some(message.into()),
        }
    }
}

/// Orchestrator states. Terminal states are `Completed` and `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    FetchingMetadata,
    FetchingPages,
    DeliveringBatches,
    Completed,
    Failed,
}

/// Terminal status of one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Every batch was accepted.
    Completed,
    /// The query matched nothing; delivery was skipped.
    NoMatchingRecords,
    /// Fetch or delivery failed; counts are partial.
    Failed,
    /// The caller declined the confirmation prompt.
    Declined,
    /// Another run was in flight.
    AlreadyRunning,
}

/// Aggregate outcome of a run. The only artifact handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub run_id: String,
    pub mode: SyncMode,
    pub status: SyncStatus,
    pub total_issues: usize,
    pub total_inserted: usize,
    pub total_updated: usize,
    pub batches_completed: usize,
    pub batches_total: usize,
    pub failed: bool,
    pub failure_message: Option<String>,
    pub retryable: bool,
    pub metadata_degraded: bool,
    pub truncated: bool,
    pub duration_ms: i64,
}

impl SyncResult {
    /// Zero-valued result for `mode` with the given status.
    pub fn empty(mode: SyncMode, status: SyncStatus) -> Self {
        Self {
            run_id: Uuid::now_v7().to_string(),
            mode,
            status,
            total_issues: 0,
            total_inserted: 0,
            total_updated: 0,
            batches_completed: 0,
            batches_total: 0,
            failed: false,
            failure_message: None,
            retryable: false,
            metadata_degraded: false,
            truncated: false,
            duration_ms: 0,
        }
    }

    pub fn declined(mode: SyncMode) -> Self {
        Self::empty(mode, SyncStatus::Declined)
    }

    pub fn already_running(mode: SyncMode) -> Self {
        Self {
            failed: true,
            failure_message: Some("A sync is already in progress".to_string()),
            retryable: true,
            ..Self::empty(mode, SyncStatus::AlreadyRunning)
        }
    }

    /// Record `error` as the reason this run failed.
    pub fn fail_with(&mut self, error: &SyncError) {
        self.status = SyncStatus::Failed;
        self.failed = true;
        self.failure_message = Some(error.to_string());
        self.retryable = error.retry_class().is_retryable();
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        match self.status {
            SyncStatus::Completed => format!(
                "Synced {} issues: {} inserted, {} updated ({} batches)",
                self.total_issues, self.total_inserted, self.total_updated, self.batches_total
            ),
            SyncStatus::NoMatchingRecords => "No issues found matching the criteria".to_string(),
            SyncStatus::Declined => "Sync cancelled".to_string(),
            SyncStatus::AlreadyRunning | SyncStatus::Failed => format!(
                "Sync failed after {}/{} batches ({} inserted, {} updated): {}",
                self.batches_completed,
                self.batches_total,
                self.total_inserted,
                self.total_updated,
                self.failure_message.as_deref().unwrap_or("Unknown error")
            ),
        }
    }
}
