//! Inference errors

use thiserror::Error;

/// Errors that can occur while talking to a generative backend
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to connect to the backend
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response envelope did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout waiting for the backend
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success status from the backend
    #[error("Server error: {0}")]
    ServerError(String),

    /// Call succeeded but carried no text
    #[error("Backend returned no text")]
    EmptyResponse,

    /// Backend configuration is incomplete or inconsistent
    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),
}

impl InferenceError {
    /// Classify a transport error, recording the configured timeout
    ///
    /// The request URL is stripped from the message so query credentials
    /// never reach logs or clients.
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
