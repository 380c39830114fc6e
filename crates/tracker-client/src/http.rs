//! Request/response plumbing shared by the tracker and store clients.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{ClientError, Result};
use crate::types::ApiErrorResponse;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const MAX_LOG_BODY_CHARS: usize = 512;

/// HTTP client with `timeout` applied to every request.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// JSON headers with an optional bearer token.
pub(crate) fn json_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::invalid_request("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);
    }

    Ok(headers)
}

fn log_response(status: reqwest::StatusCode, body: &str) {
    if status.is_success() {
        debug!("API response status: {}", status);
        return;
    }

    let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
    if body.chars().count() > MAX_LOG_BODY_CHARS {
        preview.push_str("...");
    }
    debug!("API response error ({}): {}", status, preview);
}

/// Parse a JSON response body, mapping non-success statuses to `ClientError::Api`.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    log_response(status, &body);

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(ApiErrorResponse::into_message)
            .unwrap_or_else(|| {
                let reason = status.canonical_reason().unwrap_or("Request failed");
                if body.trim().is_empty() {
                    reason.to_string()
                } else {
                    format!("{}: {}", reason, body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>())
                }
            });
        return Err(ClientError::api(status.as_u16(), message));
    }

    serde_json::from_str(&body).map_err(|e| {
        log::error!(
            "Failed to deserialize response. Body: {}, Error: {}",
            body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>(),
            e
        );
        ClientError::Json(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_include_bearer_token_when_present() {
        let headers = json_headers(Some("abc123")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
        assert_eq!(headers[CONTENT_TYPE], "application/json");

        let anonymous = json_headers(None).unwrap();
        assert!(anonymous.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn client_builds_with_timeout() {
        assert!(build_http_client(Duration::from_millis(250)).is_ok());
    }

    #[test]
    fn invalid_token_is_rejected() {
        let err = json_headers(Some("bad\ntoken")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
