//! Error types for the ticket sync engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for sync engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// How a failed run should be treated by whoever triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRetryClass {
    /// Transient; the same run may succeed later.
    Retryable,
    /// Credentials were refused; retrying without new ones is pointless.
    ReauthRequired,
    Permanent,
}

impl SyncRetryClass {
    pub fn is_retryable(self) -> bool {
        self == Self::Retryable
    }
}

/// Errors raised by the sync ports and engine stages.
///
/// None of these escape `SyncSession::run`; the orchestrator folds them into a
/// failed `SyncResult`.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Non-success response from the ticketing API or the store
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection, timeout or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Pagination stopped making progress
    #[error("Fetch anomaly: {0}")]
    FetchAnomaly(String),

    /// Store answered `success: false`
    #[error("{0}")]
    BatchRejected(String),

    /// Invalid request (bad configuration, malformed input)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SyncError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Classify for whole-run retry.
    ///
    /// Throttling, conflicts, timeouts and 5xx responses are transient; 401/403
    /// need new credentials; other statuses are permanent.
    pub fn retry_class(&self) -> SyncRetryClass {
        match self {
            Self::Api { status, .. } => match status {
                401 | 403 => SyncRetryClass::ReauthRequired,
                408 | 409 | 423 | 425 | 429 | 500..=599 => SyncRetryClass::Retryable,
                _ => SyncRetryClass::Permanent,
            },
            Self::Network(_) | Self::FetchAnomaly(_) | Self::BatchRejected(_) => {
                SyncRetryClass::Retryable
            }
            Self::Decode(_) | Self::InvalidRequest(_) => SyncRetryClass::Permanent,
        }
    }
}
