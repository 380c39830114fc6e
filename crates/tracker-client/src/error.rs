//! Error types for the ticketing API and store clients.

use thiserror::Error;
use ticketsync_core::SyncError;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the ticketing API or the store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the remote service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid request (missing required data, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => SyncError::api(status, message),
            ClientError::Http(err) if err.is_decode() => SyncError::decode(err.to_string()),
            ClientError::Http(err) => SyncError::network(err.to_string()),
            ClientError::Json(err) => SyncError::decode(err.to_string()),
            ClientError::InvalidRequest(message) => SyncError::invalid_request(message),
        }
    }
}
