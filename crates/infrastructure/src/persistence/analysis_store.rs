//! SQLite analysis store implementation
//!
//! Implements the `AnalysisStorePort` for persisting analysis history.

use std::sync::Arc;

use application::{error::ApplicationError, ports::AnalysisStorePort};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{
    AnalysisEntry, AnalysisId, AnalysisRecord, AnalysisSource, EmailText, RiskLevel,
};
use rusqlite::{OptionalExtension, Row, params, types::Type};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::ConnectionPool;

const SELECT_COLUMNS: &str = "SELECT id, email_content, purpose, payment_delayed, risk_level,
        suggested_action, drafted_reply, source_kind, source_detail, created_at
     FROM analyses";

/// SQLite-based analysis history store
#[derive(Debug, Clone)]
pub struct SqliteAnalysisStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteAnalysisStore {
    /// Create a new SQLite analysis store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStorePort for SqliteAnalysisStore {
    #[instrument(skip(self, entry), fields(analysis_id = %entry.id, source = entry.source.kind()))]
    async fn insert(&self, entry: &AnalysisEntry) -> Result<AnalysisId, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let entry = entry.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.execute(
                "INSERT INTO analyses (id, email_content, purpose, payment_delayed, risk_level,
                    suggested_action, drafted_reply, source_kind, source_detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    entry.id.to_string(),
                    entry.email_content.as_str(),
                    entry.record.purpose(),
                    entry.record.payment_delayed(),
                    entry.record.risk_level().as_str(),
                    entry.record.suggested_action(),
                    entry.record.drafted_reply(),
                    entry.source.kind(),
                    entry.source.detail(),
                    format_timestamp(entry.created_at),
                ],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!("Saved analysis");
            Ok(entry.id)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: usize) -> Result<Vec<AnalysisEntry>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&format!(
                    "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1"
                ))
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let entries = stmt
                .query_map([limit], row_to_entry)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    warn!(error = %e, "Stored analysis could not be decoded");
                    ApplicationError::Internal(e.to_string())
                })?;

            debug!(count = entries.len(), "Listed analyses");
            Ok(entries)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(analysis_id = %id))]
    async fn get(&self, id: &AnalysisId) -> Result<Option<AnalysisEntry>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let id_str = id.to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [&id_str],
                row_to_entry,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    async fn is_healthy(&self) -> bool {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            pool.get()
                .ok()
                .and_then(|conn| {
                    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                        .ok()
                })
                .is_some()
        })
        .await
        .unwrap_or(false)
    }
}

/// Fixed-width UTC timestamps so text ordering matches time ordering
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    column: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}

/// Convert a database row to an AnalysisEntry
fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<AnalysisEntry> {
    let id_str: String = row.get(0)?;
    let email_content: String = row.get(1)?;
    let purpose: String = row.get(2)?;
    let payment_delayed: bool = row.get(3)?;
    let risk_level_str: String = row.get(4)?;
    let suggested_action: String = row.get(5)?;
    let drafted_reply: String = row.get(6)?;
    let source_kind: String = row.get(7)?;
    let source_detail: Option<String> = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    let id = AnalysisId::parse(&id_str).map_err(|e| conversion_error(0, e))?;
    let risk_level = RiskLevel::parse(&risk_level_str).map_err(|e| conversion_error(4, e))?;
    let record = AnalysisRecord::new(
        purpose,
        payment_delayed,
        risk_level,
        suggested_action,
        drafted_reply,
    )
    .map_err(|e| conversion_error(2, e))?;
    let source = AnalysisSource::from_parts(&source_kind, source_detail)
        .map_err(|e| conversion_error(7, e))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| conversion_error(9, e))?
        .with_timezone(&Utc);

    Ok(AnalysisEntry {
        id,
        email_content: EmailText::new(email_content),
        record,
        source,
        created_at,
    })
}
