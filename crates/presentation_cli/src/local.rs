//! Commands that run the engine in-process

use std::{path::Path, sync::Arc};

use anyhow::Context;
use application::{
    AnalysisService, HistoryService, ReportService, Strategy,
    ports::{GenerativePort, Report, ReportFormat},
};
use domain::EmailText;
use infrastructure::{
    AppConfig, GenerativeBackendAdapter, SqliteAnalysisStore, TeraReportRenderer, create_pool,
};
use presentation_http::handlers::{analyze::AnalyzeResponse, common::SourceFields};
use tokio::io::AsyncReadExt;
use tracing::info;

/// Load and validate configuration
pub fn load_config(file: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load_from(file).context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

/// Read the email from a file, or stdin when no file is given
pub async fn read_email(file: Option<&Path>) -> anyhow::Result<EmailText> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        },
    };

    let email = EmailText::new(text);
    anyhow::ensure!(!email.is_blank(), "Email text is empty");
    Ok(email)
}

/// Analyze one email, optionally recording it in the history database
pub async fn analyze(
    config: AppConfig,
    email: EmailText,
    strategy: Option<Strategy>,
    save: bool,
) -> anyhow::Result<AnalyzeResponse> {
    let backend = GenerativeBackendAdapter::from_config(&config.backend)?
        .map(|adapter| Arc::new(adapter) as Arc<dyn GenerativePort>);
    let service = AnalysisService::new(backend, config.analysis.to_analysis_config());
    let strategy = strategy
        .unwrap_or_else(|| config.analysis.resolved_strategy(service.has_backend()));

    info!(strategy = strategy.as_str(), "Analyzing email");
    let outcome = service.analyze(&email, strategy).await?;

    let id = if save {
        let pool = create_pool(&config.database)?;
        let history = HistoryService::new(Arc::new(SqliteAnalysisStore::new(Arc::new(pool))));
        history.record(&email, &outcome).await
    } else {
        None
    };

    Ok(AnalyzeResponse {
        id: id.map(|id| id.to_string()),
        source: SourceFields::from(&outcome.source),
        record: outcome.record,
    })
}

/// Render a report from a JSON file holding an analysis record
pub async fn render_report(
    config: AppConfig,
    input: &Path,
    format: ReportFormat,
) -> anyhow::Result<Report> {
    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let data: serde_json::Value =
        serde_json::from_str(&raw).context("Analysis file is not valid JSON")?;

    let renderer = TeraReportRenderer::new(config.report)?;
    let report = ReportService::new(Arc::new(renderer)).render(&data, format)?;
    Ok(report)
}
