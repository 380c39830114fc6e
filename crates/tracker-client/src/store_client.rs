//! Client for the persistent store's upsert endpoint.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use ticketsync_core::sync::{BatchResult, FieldNameMap, IssueStoreTrait, RawIssue};

use crate::error::Result;
use crate::http::{build_http_client, json_headers, parse_response, DEFAULT_TIMEOUT_SECS};
use crate::types::{UpsertRequest, UpsertResponse};

/// Client for the store upsert endpoint.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    endpoint_url: String,
    token: Option<String>,
}

impl StoreClient {
    /// `endpoint_url` is the full URL that accepts upsert batches.
    pub fn new(endpoint_url: &str) -> Result<Self> {
        Self::with_timeout(endpoint_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint_url: endpoint_url.trim().to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Upsert one batch of issues.
    ///
    /// POST {endpoint_url}
    pub async fn upsert_issues(&self, request: &UpsertRequest<'_>) -> Result<UpsertResponse> {
        debug!(
            "Upserting {} issues with {} field names",
            request.issues.len(),
            request.field_names.len()
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .headers(json_headers(self.token.as_deref())?)
            .json(request)
            .send()
            .await?;

        parse_response(response).await
    }
}

#[async_trait]
impl IssueStoreTrait for StoreClient {
    async fn upsert(
        &self,
        issues: &[RawIssue],
        field_names: &FieldNameMap,
    ) -> ticketsync_core::Result<BatchResult> {
        let response = self
            .upsert_issues(&UpsertRequest {
                issues,
                field_names,
            })
            .await?;

        Ok(BatchResult {
            success: response.success,
            inserted: response.inserted,
            updated: response.updated,
            error_message: response.message,
        })
    }
}
