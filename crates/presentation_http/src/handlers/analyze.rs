//! Email analysis handler

use application::Strategy;
use axum::{Json, extract::State};
use domain::{AnalysisRecord, EmailText};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use validator::Validate;

use crate::{
    error::ApiError, handlers::common::SourceFields, middleware::ValidatedJson, state::AppState,
};

/// Analysis request body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Raw email text
    #[serde(alias = "email")]
    #[validate(custom(function = "not_blank", message = "must not be empty"))]
    pub email_content: String,
    /// Strategy override; the configured default when absent
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Analysis response body: the record's fields plus provenance
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// History id, absent when the result could not be stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub record: AnalysisRecord,
    #[serde(flatten)]
    pub source: SourceFields,
}

/// Analyze one email
#[instrument(skip(state, request), fields(email_len = request.email_content.len()))]
pub async fn analyze(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let strategy = request
        .strategy
        .unwrap_or_else(|| state.default_strategy());
    let email = EmailText::new(request.email_content);

    let outcome = state
        .analysis
        .analyze(&email, strategy)
        .await
        .map_err(|e| {
            warn!(stage = e.stage().as_str(), reason = %e.fallback_reason(), "Analysis failed");
            ApiError::from(e)
        })?;

    let id = state.history.record(&email, &outcome).await;

    Ok(Json(AnalyzeResponse {
        id: id.map(|id| id.to_string()),
        source: SourceFields::from(&outcome.source),
        record: outcome.record,
    }))
}
