//! In-memory fakes of the sync ports for tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::sync_model::{
    BatchResult, FieldDefinition, FieldNameMap, PageRequest, PageResponse, RawIssue, SyncPhase,
    SyncResult,
};
use super::sync_traits::{IssueSourceTrait, IssueStoreTrait, SyncProgressReporter};
use crate::errors::{Result, SyncError};

/// `count` issues with sequential ids starting at `start`.
pub fn issues(start: usize, count: usize) -> Vec<RawIssue> {
    (start..start + count)
        .map(|n| {
            let mut issue = RawIssue::new(n.to_string());
            issue
                .fields
                .insert("key".to_string(), serde_json::json!(format!("OPS-{}", n)));
            issue
        })
        .collect()
}

pub fn page(issues: Vec<RawIssue>, total_matching: usize) -> PageResponse {
    PageResponse {
        issues,
        total_matching,
    }
}

fn ids(issues: &[RawIssue]) -> Vec<String> {
    issues.iter().map(|issue| issue.id.clone()).collect()
}

/// Source that replays scripted pages in order and records every request.
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Result<PageResponse>>>,
    fields: Mutex<Option<Result<Vec<FieldDefinition>>>>,
    requests: Mutex<Vec<PageRequest>>,
    field_calls: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Result<PageResponse>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            fields: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            field_calls: Mutex::new(0),
        }
    }

    pub fn with_fields(self, fields: Result<Vec<FieldDefinition>>) -> Self {
        *self.fields.lock().unwrap() = Some(fields);
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn field_calls(&self) -> usize {
        *self.field_calls.lock().unwrap()
    }
}

#[async_trait]
impl IssueSourceTrait for ScriptedSource {
    async fn search(&self, request: &PageRequest) -> Result<PageResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::network("no scripted page left")))
    }

    async fn list_fields(&self) -> Result<Vec<FieldDefinition>> {
        *self.field_calls.lock().unwrap() += 1;
        self.fields.lock().unwrap().take().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// One recorded upsert call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertCall {
    pub ids: Vec<String>,
    pub field_names: FieldNameMap,
}

/// Store that replays scripted batch outcomes, then accepts everything as inserts.
#[derive(Default)]
pub struct RecordingStore {
    outcomes: Mutex<VecDeque<Result<BatchResult>>>,
    calls: Mutex<Vec<UpsertCall>>,
}

impl RecordingStore {
    pub fn new(outcomes: Vec<Result<BatchResult>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<UpsertCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueStoreTrait for RecordingStore {
    async fn upsert(
        &self,
        issues: &[RawIssue],
        field_names: &FieldNameMap,
    ) -> Result<BatchResult> {
        self.calls.lock().unwrap().push(UpsertCall {
            ids: ids(issues),
            field_names: field_names.clone(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(BatchResult::ok(issues.len(), 0)))
    }
}

/// Store keyed by issue id: first write inserts, later writes update.
#[derive(Default)]
pub struct KeyedStore {
    known: Mutex<HashSet<String>>,
}

#[async_trait]
impl IssueStoreTrait for KeyedStore {
    async fn upsert(
        &self,
        issues: &[RawIssue],
        _field_names: &FieldNameMap,
    ) -> Result<BatchResult> {
        let mut known = self.known.lock().unwrap();
        let mut result = BatchResult::ok(0, 0);
        for issue in issues {
            if known.insert(issue.id.clone()) {
                result.inserted += 1;
            } else {
                result.updated += 1;
            }
        }
        Ok(result)
    }
}

/// Reporter that records every callback.
#[derive(Default)]
pub struct RecordingReporter {
    phases: Mutex<Vec<SyncPhase>>,
    fetch: Mutex<Vec<(usize, usize)>>,
    batches: Mutex<Vec<(usize, usize)>>,
    completed: Mutex<Vec<SyncResult>>,
}

impl RecordingReporter {
    pub fn phases(&self) -> Vec<SyncPhase> {
        self.phases.lock().unwrap().clone()
    }

    pub fn fetch_progress(&self) -> Vec<(usize, usize)> {
        self.fetch.lock().unwrap().clone()
    }

    pub fn batch_progress(&self) -> Vec<(usize, usize)> {
        self.batches.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<SyncResult> {
        self.completed.lock().unwrap().clone()
    }
}

impl SyncProgressReporter for RecordingReporter {
    fn on_phase(&self, phase: SyncPhase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn on_fetch_progress(&self, fetched: usize, total: usize) {
        self.fetch.lock().unwrap().push((fetched, total));
    }

    fn on_batch_progress(&self, completed: usize, total_batches: usize) {
        self.batches.lock().unwrap().push((completed, total_batches));
    }

    fn on_complete(&self, result: &SyncResult) {
        self.completed.lock().unwrap().push(result.clone());
    }
}
