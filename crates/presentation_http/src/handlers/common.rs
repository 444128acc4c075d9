//! Shared response pieces for HTTP handlers

use domain::AnalysisSource;
use serde::Serialize;

/// Provenance fields flattened into analysis responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFields {
    /// `model`, `rules` or `rule_fallback`
    pub source: &'static str,
    /// Model that produced the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Why the rule engine stood in for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl From<&AnalysisSource> for SourceFields {
    fn from(source: &AnalysisSource) -> Self {
        let (model, fallback_reason) = match source {
            AnalysisSource::Model { model } => (Some(model.clone()), None),
            AnalysisSource::Rules => (None, None),
            AnalysisSource::RuleFallback { reason } => (None, Some(reason.clone())),
        };
        Self {
            source: source.kind(),
            model,
            fallback_reason,
        }
    }
}
