//! Wire types for the ticketing API and the store endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ticketsync_core::sync::{FieldNameMap, RawIssue};

/// Standard fields requested on every search, plus every custom field.
pub const DEFAULT_SEARCH_FIELDS: [&str; 12] = [
    "summary",
    "issuetype",
    "status",
    "project",
    "resolution",
    "assignee",
    "reporter",
    "creator",
    "created",
    "updated",
    "resolutiondate",
    "customfield_*",
];

/// POST /rest/api/2/search body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub jql: String,
    pub start_at: usize,
    pub max_results: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<String>,
}

/// POST /rest/api/2/search response. Paging echo fields are ignored; `total` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    pub total: usize,
}

/// One element of GET /rest/api/2/field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResponse {
    pub id: String,
    pub name: String,
}

/// Store upsert body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRequest<'a> {
    pub issues: &'a [RawIssue],
    pub field_names: &'a FieldNameMap,
}

/// Store upsert response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResponse {
    pub success: bool,
    #[serde(default)]
    pub inserted: usize,
    #[serde(default)]
    pub updated: usize,
    pub message: Option<String>,
}

/// Error body shapes: the tracker's `errorMessages`/`errors` and a plain `message`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Flatten into one line, or `None` when the body carried nothing useful.
    pub fn into_message(self) -> Option<String> {
        let mut parts = self.error_messages;
        parts.extend(
            self.errors
                .into_iter()
                .map(|(field, message)| format!("{}: {}", field, message)),
        );
        parts.extend(self.message);
        let parts: Vec<String> = parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
