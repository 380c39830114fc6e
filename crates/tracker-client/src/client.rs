//! Ticketing API client: paged issue search and the field catalog.
//!
//! Speaks the tracker's REST v2 shape (`/rest/api/2/search`, `/rest/api/2/field`).

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use ticketsync_core::sync::{FieldDefinition, IssueSourceTrait, PageRequest, PageResponse};

use crate::error::Result;
use crate::http::{build_http_client, json_headers, parse_response, DEFAULT_TIMEOUT_SECS};
use crate::types::{FieldResponse, SearchRequest, SearchResponse, DEFAULT_SEARCH_FIELDS};

/// Client for the remote ticketing API.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    fields: Vec<String>,
}

impl TrackerClient {
    /// Create a new tracker client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the tracker (e.g., "https://jira.example.com")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client whose requests fail once `timeout` elapses.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            fields: DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search issues.
    ///
    /// POST /rest/api/2/search
    pub async fn search_issues(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        debug!(
            "Searching issues startAt={} maxResults={}",
            request.start_at, request.max_results
        );

        let response = self
            .client
            .post(&url)
            .headers(json_headers(self.token.as_deref())?)
            .json(request)
            .send()
            .await?;

        parse_response(response).await
    }

    /// List every field the tracker knows about.
    ///
    /// GET /rest/api/2/field
    pub async fn list_fields(&self) -> Result<Vec<FieldResponse>> {
        let url = format!("{}/rest/api/2/field", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(json_headers(self.token.as_deref())?)
            .send()
            .await?;

        parse_response(response).await
    }
}

#[async_trait]
impl IssueSourceTrait for TrackerClient {
    async fn search(&self, request: &PageRequest) -> ticketsync_core::Result<PageResponse> {
        let response = self
            .search_issues(&SearchRequest {
                jql: request.query.clone(),
                start_at: request.offset,
                max_results: request.limit,
                fields: self.fields.clone(),
            })
            .await?;

        Ok(PageResponse {
            issues: response.issues,
            total_matching: response.total,
        })
    }

    async fn list_fields(&self) -> ticketsync_core::Result<Vec<FieldDefinition>> {
        let fields = TrackerClient::list_fields(self).await?;
        Ok(fields
            .into_iter()
            .map(|field| FieldDefinition {
                id: field.id,
                name: field.name,
            })
            .collect())
    }
}
