//! Request validation
//!
//! Provides a `ValidatedJson` extractor that validates request bodies using the validator crate.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::Validate;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Keeps 413 for oversized bodies and 415 for a wrong content type
            Self::JsonError(e) => match e.status() {
                StatusCode::UNPROCESSABLE_ENTITY => (StatusCode::BAD_REQUEST, e.body_text()),
                status => (status, e.body_text()),
            },
            Self::ValidationFailed(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": "validation_error"
        });

        (status, Json(body)).into_response()
    }
}

/// A JSON extractor that also validates the request body
///
/// Use this instead of `Json<T>` when the body type derives `Validate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate().map_err(|e| {
            let mut errors: Vec<String> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors
                        .iter()
                        .map(|error| {
                            format!(
                                "{}: {}",
                                field,
                                error
                                    .message
                                    .as_ref()
                                    .map_or_else(|| error.code.to_string(), ToString::to_string)
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .collect();
            errors.sort();

            ValidationError::ValidationFailed(errors.join("; "))
        })?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
        message: String,
    }

    async fn test_handler(ValidatedJson(req): ValidatedJson<TestRequest>) -> String {
        req.message
    }

    fn create_test_app() -> Router {
        Router::new().route("/test", post(test_handler))
    }

    async fn post_json(body: &'static str) -> StatusCode {
        create_test_app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn valid_request_passes() {
        assert_eq!(post_json(r#"{"message": "hello"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_message_rejected() {
        assert_eq!(post_json(r#"{"message": ""}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_json_rejected() {
        assert_eq!(
            post_json(r#"{"message": not valid json}"#).await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn missing_field_rejected_as_bad_request() {
        assert_eq!(post_json(r#"{"other": 1}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_unsupported_media_type() {
        let status = create_test_app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .body(Body::from(r#"{"message": "hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
