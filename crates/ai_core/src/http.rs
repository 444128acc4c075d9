//! Shared HTTP plumbing for the provider clients

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::InferenceError;

pub(crate) fn build_client(timeout_ms: u64) -> Result<Client, InferenceError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))
}

/// Turn a non-success status into a classified error
pub(crate) async fn ensure_success(response: Response) -> Result<Response, InferenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = %status, "Backend request failed");
    debug!(body = %body, "Backend error body");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            InferenceError::Unauthorized(status.to_string())
        },
        StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited,
        _ => InferenceError::ServerError(format!("Status {status}: {body}")),
    })
}

/// Decode the JSON envelope of a successful response
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
    timeout_ms: u64,
) -> Result<T, InferenceError> {
    let body = response
        .text()
        .await
        .map_err(|e| InferenceError::from_transport(e, timeout_ms))?;
    serde_json::from_str(&body).map_err(|e| InferenceError::InvalidResponse(e.to_string()))
}

/// Reject missing or whitespace-only completions, leaving real text untouched
pub(crate) fn require_text(text: Option<String>) -> Result<String, InferenceError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(InferenceError::EmptyResponse),
    }
}
