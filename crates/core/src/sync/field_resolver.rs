//! Field catalog lookup, degrading to an empty map on failure.

use std::sync::Arc;

use log::{debug, warn};

use super::sync_model::FieldNameMap;
use super::sync_traits::IssueSourceTrait;

/// Resolves opaque field identifiers into display names, once per run.
pub struct FieldMetadataResolver {
    source: Arc<dyn IssueSourceTrait>,
    run_id: String,
}

impl FieldMetadataResolver {
    pub fn new(source: Arc<dyn IssueSourceTrait>) -> Self {
        Self {
            source,
            run_id: "-".to_string(),
        }
    }

    /// Tag log lines with the owning run.
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Issues exactly one catalog request. Never fails: a transport error is
    /// logged and an empty map returned so the run can continue.
    pub async fn resolve_field_names(&self) -> FieldNameMap {
        match self.source.list_fields().await {
            Ok(definitions) => {
                let names = FieldNameMap::from_definitions(definitions);
                debug!(
                    "[TicketSync] run={} Resolved {} field names",
                    self.run_id,
                    names.len()
                );
                names
            }
            Err(err) => {
                warn!(
                    "[TicketSync] run={} Field catalog unavailable, continuing with unresolved field names: {}",
                    self.run_id,
                    err
                );
                FieldNameMap::empty()
            }
        }
    }
}
