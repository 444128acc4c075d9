//! Analysis history handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::SecondsFormat;
use domain::{AnalysisEntry, AnalysisId, AnalysisRecord};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, handlers::common::SourceFields, state::AppState};

/// Query parameters for listing history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of entries; clamped to 1..=500, default 100
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One stored analysis
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub email_content: String,
    #[serde(flatten)]
    pub record: AnalysisRecord,
    #[serde(flatten)]
    pub source: SourceFields,
    /// RFC 3339, UTC
    pub created_at: String,
}

impl From<AnalysisEntry> for HistoryItem {
    fn from(entry: AnalysisEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            source: SourceFields::from(&entry.source),
            email_content: entry.email_content.into_inner(),
            record: entry.record,
            created_at: entry
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// List recent analyses, newest first
#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let entries = state.history.list(query.limit).await?;
    Ok(Json(entries.into_iter().map(HistoryItem::from).collect()))
}

/// Fetch one analysis by id
#[instrument(skip(state))]
pub async fn get_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryItem>, ApiError> {
    let id = AnalysisId::parse(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid analysis id: {id}")))?;

    state
        .history
        .get(&id)
        .await?
        .map(|entry| Json(HistoryItem::from(entry)))
        .ok_or_else(|| ApiError::NotFound(format!("Analysis {id}")))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use domain::{AnalysisSource, EmailText, RiskLevel};

    use super::*;

    #[test]
    fn history_item_wire_format() {
        let record =
            AnalysisRecord::new("Purchase Order", false, RiskLevel::Low, "Acknowledge.", "Hi")
                .unwrap();
        let mut entry = AnalysisEntry::new(
            EmailText::new("PO 778 attached"),
            record,
            AnalysisSource::Rules,
        );
        entry.created_at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let json = serde_json::to_value(HistoryItem::from(entry)).unwrap();
        assert_eq!(json["emailContent"], "PO 778 attached");
        assert_eq!(json["purpose"], "Purchase Order");
        assert_eq!(json["paymentDelayed"], false);
        assert_eq!(json["riskLevel"], "low");
        assert_eq!(json["source"], "rules");
        assert_eq!(json["createdAt"], "2026-05-01T12:00:00.000Z");
        assert!(json["id"].as_str().is_some());
    }
}
