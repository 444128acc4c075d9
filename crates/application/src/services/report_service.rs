//! Report generation from client-supplied analysis data
//!
//! The data arrives as arbitrary JSON, so it goes through the same schema
//! validator as model output before anything is rendered.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use crate::error::{AnalysisError, ApplicationError, ParseError};
use crate::ports::{Report, ReportFormat, ReportOptions, ReportRendererPort};
use crate::services::response_parser::UnvalidatedStructure;
use crate::services::schema_validator;

/// Validates analysis data and renders it
pub struct ReportService {
    renderer: Arc<dyn ReportRendererPort>,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService").finish_non_exhaustive()
    }
}

impl ReportService {
    /// Create a report service
    #[must_use]
    pub fn new(renderer: Arc<dyn ReportRendererPort>) -> Self {
        Self { renderer }
    }

    /// Validate `analysis_data` and render it in `format`
    #[instrument(skip(self, analysis_data))]
    pub fn render(
        &self,
        analysis_data: &Value,
        format: ReportFormat,
    ) -> Result<Report, ApplicationError> {
        let Value::Object(fields) = analysis_data else {
            return Err(AnalysisError::Parse(ParseError::NoStructureFound).into());
        };
        let record = schema_validator::validate(&UnvalidatedStructure::new(fields.clone()))
            .map_err(AnalysisError::from)?;
        self.renderer.render(&record, &ReportOptions::now(format))
    }
}
