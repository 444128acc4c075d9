//! API error handling
//!
//! Provides sanitized error responses that don't leak implementation details.
//! Unless internal errors are exposed, 5xx responses carry generic messages only.

use application::{AnalysisError, ApplicationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Configure whether internal error details should be exposed in responses.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

/// Check if internal error details should be exposed
fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Sanitize a client-facing message
///
/// Messages that look like they carry paths, connection strings or
/// backtraces are replaced with a generic one.
fn sanitize_error_message(msg: &str) -> String {
    if should_expose_details() {
        return msg.to_string();
    }

    let sensitive_patterns = [
        // File paths
        "/home/",
        "/Users/",
        "/var/",
        "/etc/",
        "\\Users\\",
        "C:\\",
        // Database patterns
        "sqlite://",
        // Stack trace indicators
        "stack backtrace",
        "panicked at",
        ".rs:",
        // Connection details
        "connection refused",
        "ECONNREFUSED",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns
        .iter()
        .any(|pattern| msg_lower.contains(&pattern.to_lowercase()))
    {
        return "An error occurred processing your request".to_string();
    }

    if msg.contains("://") {
        return "An error occurred processing your request".to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The analysis pipeline failed and no fallback applied
    #[error("Analysis failed at {stage}: {reason}")]
    AnalysisFailed {
        stage: &'static str,
        reason: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                sanitize_error_message(msg),
                None,
            ),
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                sanitize_error_message(msg),
                None,
            ),
            Self::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                msg.clone(),
                None,
            ),
            Self::AnalysisFailed { stage, reason } => {
                // Raw backend text never reaches the client
                let details = if should_expose_details() {
                    Some(format!("{stage}: {reason}"))
                } else {
                    None
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "analysis_failed",
                    "Failed to analyze email".to_string(),
                    details,
                )
            },
            Self::Internal(msg) => {
                let details = if should_expose_details() {
                    Some(msg.clone())
                } else {
                    None
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    details,
                )
            },
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InputTooLarge { limit, actual } => Self::PayloadTooLarge(format!(
                "Email has {actual} characters, limit is {limit}"
            )),
            other => Self::AnalysisFailed {
                stage: other.stage().as_str(),
                reason: other.fallback_reason(),
            },
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Analysis(e) => e.into(),
            ApplicationError::Rendering(msg)
            | ApplicationError::Configuration(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}
