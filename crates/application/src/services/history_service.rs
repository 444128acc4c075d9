//! Analysis history
//!
//! Recording is best effort: a store failure is logged and swallowed so
//! that a finished analysis is never lost to a database problem.

use std::sync::Arc;

use domain::{AnalysisEntry, AnalysisId, EmailText};
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::AnalysisStorePort;
use crate::services::analysis_service::AnalysisOutcome;

/// Default number of entries returned by [`HistoryService::list`]
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Upper bound on entries returned by [`HistoryService::list`]
pub const MAX_HISTORY_LIMIT: usize = 500;

/// Service over the analysis store
pub struct HistoryService {
    store: Arc<dyn AnalysisStorePort>,
}

impl std::fmt::Debug for HistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryService").finish_non_exhaustive()
    }
}

impl HistoryService {
    /// Create a history service
    #[must_use]
    pub fn new(store: Arc<dyn AnalysisStorePort>) -> Self {
        Self { store }
    }

    /// Store a finished analysis; returns `None` if the store failed
    #[instrument(skip(self, email, outcome), fields(source = outcome.source.kind()))]
    pub async fn record(&self, email: &EmailText, outcome: &AnalysisOutcome) -> Option<AnalysisId> {
        let entry = AnalysisEntry::new(
            email.clone(),
            outcome.record.clone(),
            outcome.source.clone(),
        );
        match self.store.insert(&entry).await {
            Ok(id) => {
                debug!(id = %id, "Analysis stored");
                Some(id)
            },
            Err(e) => {
                warn!(error = %e, "Failed to store analysis");
                None
            },
        }
    }

    /// Most recent entries, `limit` clamped to `1..=MAX_HISTORY_LIMIT`
    #[instrument(skip(self))]
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<AnalysisEntry>, ApplicationError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        self.store.list(limit).await
    }

    /// One entry by id
    pub async fn get(&self, id: &AnalysisId) -> Result<Option<AnalysisEntry>, ApplicationError> {
        self.store.get(id).await
    }

    /// Whether the store answers
    pub async fn is_healthy(&self) -> bool {
        self.store.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockAnalysisStorePort;
    use domain::{AnalysisRecord, AnalysisSource, RiskLevel};
    use mockall::predicate::eq;

    fn outcome() -> AnalysisOutcome {
        AnalysisOutcome {
            record: AnalysisRecord::new("Invoice", false, RiskLevel::Low, "Pay", "Thanks").unwrap(),
            source: AnalysisSource::Rules,
        }
    }

    #[tokio::test]
    async fn record_returns_stored_id() {
        let mut store = MockAnalysisStorePort::new();
        store
            .expect_insert()
            .times(1)
            .withf(|entry| entry.record.purpose() == "Invoice" && entry.source == AnalysisSource::Rules)
            .returning(|entry| Ok(entry.id));
        let service = HistoryService::new(Arc::new(store));

        let id = service.record(&EmailText::new("hello"), &outcome()).await;
        assert!(id.is_some());
    }

    #[tokio::test]
    async fn store_failure_is_swallowed() {
        let mut store = MockAnalysisStorePort::new();
        store
            .expect_insert()
            .returning(|_| Err(ApplicationError::Internal("disk full".to_string())));
        let service = HistoryService::new(Arc::new(store));

        assert!(service.record(&EmailText::new("hello"), &outcome()).await.is_none());
    }

    #[tokio::test]
    async fn list_defaults_to_one_hundred() {
        let mut store = MockAnalysisStorePort::new();
        store
            .expect_list()
            .with(eq(DEFAULT_HISTORY_LIMIT))
            .returning(|_| Ok(Vec::new()));
        let service = HistoryService::new(Arc::new(store));

        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_clamps_limit() {
        let mut store = MockAnalysisStorePort::new();
        store
            .expect_list()
            .with(eq(MAX_HISTORY_LIMIT))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        store
            .expect_list()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let service = HistoryService::new(Arc::new(store));

        service.list(Some(10_000)).await.unwrap();
        service.list(Some(0)).await.unwrap();
    }
}
