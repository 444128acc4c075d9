//! Provenance of an analysis record

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Which strategy actually produced an analysis record
///
/// Consumers use this to tell model output apart from the deterministic
/// rule engine, including the degraded case where the rule engine stood in
/// for a failed generative call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Produced by a generative backend and validated
    Model {
        /// Backend model identifier
        model: String,
    },
    /// Produced by the rule engine on request
    Rules,
    /// Produced by the rule engine after the generative path failed
    RuleFallback {
        /// Classified failure that triggered the fallback
        reason: String,
    },
}

impl AnalysisSource {
    /// Short machine-readable tag
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Model { .. } => "model",
            Self::Rules => "rules",
            Self::RuleFallback { .. } => "rule_fallback",
        }
    }

    /// Variant payload, if any
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Model { model } => Some(model),
            Self::Rules => None,
            Self::RuleFallback { reason } => Some(reason),
        }
    }

    /// Whether the record came from the rule engine
    #[must_use]
    pub const fn is_rule_derived(&self) -> bool {
        matches!(self, Self::Rules | Self::RuleFallback { .. })
    }

    /// Whether this record is a degraded stand-in for a model result
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::RuleFallback { .. })
    }

    /// Rebuild from the `(kind, detail)` pair used in storage
    pub fn from_parts(kind: &str, detail: Option<String>) -> Result<Self, DomainError> {
        match kind {
            "model" => Ok(Self::Model {
                model: detail.unwrap_or_default(),
            }),
            "rules" => Ok(Self::Rules),
            "rule_fallback" => Ok(Self::RuleFallback {
                reason: detail.unwrap_or_default(),
            }),
            other => Err(DomainError::InvalidSource(other.to_string())),
        }
    }
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            AnalysisSource::Model {
                model: "m".to_string()
            }
            .kind(),
            "model"
        );
        assert_eq!(AnalysisSource::Rules.kind(), "rules");
        assert_eq!(
            AnalysisSource::RuleFallback {
                reason: "x".to_string()
            }
            .kind(),
            "rule_fallback"
        );
    }

    #[test]
    fn fallback_is_degraded_and_rule_derived() {
        let source = AnalysisSource::RuleFallback {
            reason: "backend unavailable".to_string(),
        };
        assert!(source.is_degraded());
        assert!(source.is_rule_derived());
        assert!(!AnalysisSource::Rules.is_degraded());
    }

    #[test]
    fn parts_roundtrip() {
        let source = AnalysisSource::RuleFallback {
            reason: "timeout".to_string(),
        };
        let rebuilt =
            AnalysisSource::from_parts(source.kind(), source.detail().map(str::to_string))
                .unwrap();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(AnalysisSource::from_parts("oracle", None).is_err());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&AnalysisSource::Rules).unwrap();
        assert_eq!(json, r#"{"kind":"rules"}"#);
    }
}
