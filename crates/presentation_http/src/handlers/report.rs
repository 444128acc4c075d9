//! Report rendering handler

use application::{ApplicationError, ports::ReportFormat};
use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Report request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// An analysis record in its JSON wire form; validated before rendering
    pub analysis_data: serde_json::Value,
    /// Output format, text by default
    #[serde(default)]
    pub format: ReportFormat,
}

/// Render an analysis record as a downloadable report
#[instrument(skip(state, request), fields(format = ?request.format))]
pub async fn render_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Response, ApiError> {
    let report = state
        .reports
        .render(&request.analysis_data, request.format)
        .map_err(|e| match e {
            ApplicationError::Analysis(e) => {
                ApiError::BadRequest(format!("Invalid analysis data: {e}"))
            },
            other => ApiError::from(other),
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.filename),
            ),
        ],
        report.body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_text() {
        let request: ReportRequest =
            serde_json::from_str(r#"{"analysisData": {"purpose": "Invoice"}}"#).unwrap();
        assert_eq!(request.format, ReportFormat::Text);
    }

    #[test]
    fn html_format_parses() {
        let request: ReportRequest =
            serde_json::from_str(r#"{"analysisData": {}, "format": "html"}"#).unwrap();
        assert_eq!(request.format, ReportFormat::Html);
    }
}
