//! Application state shared across handlers

use std::sync::Arc;

use application::{
    AnalysisService, ApplicationError, HistoryService, ReportService, Strategy,
    ports::GenerativePort,
};
use infrastructure::{
    AppConfig, GenerativeBackendAdapter, SqliteAnalysisStore, TeraReportRenderer, create_pool,
};
use tracing::info;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Analysis orchestrator
    pub analysis: Arc<AnalysisService>,
    /// Analysis history
    pub history: Arc<HistoryService>,
    /// Report rendering
    pub reports: Arc<ReportService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble state from already-built services
    #[must_use]
    pub fn new(
        analysis: Arc<AnalysisService>,
        history: Arc<HistoryService>,
        reports: Arc<ReportService>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            analysis,
            history,
            reports,
            config,
        }
    }

    /// Wire every adapter from configuration
    pub fn from_config(config: AppConfig) -> Result<Self, ApplicationError> {
        config.validate()?;

        let backend = GenerativeBackendAdapter::from_config(&config.backend)?
            .map(|adapter| Arc::new(adapter) as Arc<dyn GenerativePort>);
        let analysis = AnalysisService::new(backend, config.analysis.to_analysis_config());

        let pool = create_pool(&config.database)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        let history = HistoryService::new(Arc::new(SqliteAnalysisStore::new(Arc::new(pool))));

        let renderer = TeraReportRenderer::new(config.report.clone())?;
        let reports = ReportService::new(Arc::new(renderer));

        info!(
            backend = analysis.has_backend(),
            database = %config.database.path,
            "Application state initialized"
        );

        Ok(Self::new(
            Arc::new(analysis),
            Arc::new(history),
            Arc::new(reports),
            Arc::new(config),
        ))
    }

    /// Strategy for requests that do not name one
    #[must_use]
    pub fn default_strategy(&self) -> Strategy {
        self.config
            .analysis
            .resolved_strategy(self.analysis.has_backend())
    }
}
