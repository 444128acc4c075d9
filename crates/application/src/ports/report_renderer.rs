//! Report rendering port

use chrono::{DateTime, Utc};
use domain::AnalysisRecord;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text
    #[default]
    Text,
    /// Self-contained HTML page
    Html,
}

impl ReportFormat {
    /// MIME type of the rendered body
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
        }
    }

    /// File extension for downloads
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
        }
    }
}

/// Per-report settings
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Output format
    pub format: ReportFormat,
    /// Date printed on the report
    pub generated_at: DateTime<Utc>,
}

impl ReportOptions {
    /// Options dated now
    #[must_use]
    pub fn now(format: ReportFormat) -> Self {
        Self {
            format,
            generated_at: Utc::now(),
        }
    }
}

/// A rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// MIME type
    pub content_type: &'static str,
    /// Suggested download name
    pub filename: String,
    /// Rendered body
    pub body: String,
}

/// Port for turning an analysis record into a fixed-layout document
#[cfg_attr(test, automock)]
pub trait ReportRendererPort: Send + Sync {
    /// Render a record
    fn render(
        &self,
        record: &AnalysisRecord,
        options: &ReportOptions,
    ) -> Result<Report, ApplicationError>;
}
