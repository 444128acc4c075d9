//! Analysis history storage port

use async_trait::async_trait;
use domain::{AnalysisEntry, AnalysisId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisting analyses
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnalysisStorePort: Send + Sync {
    /// Store an entry and return its id
    async fn insert(&self, entry: &AnalysisEntry) -> Result<AnalysisId, ApplicationError>;

    /// Most recent entries first, at most `limit`
    async fn list(&self, limit: usize) -> Result<Vec<AnalysisEntry>, ApplicationError>;

    /// Fetch one entry
    async fn get(&self, id: &AnalysisId) -> Result<Option<AnalysisEntry>, ApplicationError>;

    /// Whether the store answers queries
    async fn is_healthy(&self) -> bool;
}
