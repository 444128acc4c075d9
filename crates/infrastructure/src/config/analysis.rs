//! Analysis orchestration settings.

use std::time::Duration;

use application::{AnalysisConfig, DEFAULT_MAX_EMAIL_CHARS, FallbackPolicy, Strategy};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Orchestrator configuration as loaded from file/environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisAppConfig {
    /// Strategy used when a request names none.
    ///
    /// Unset means generative when a backend is configured, rule based otherwise.
    #[serde(default)]
    pub default_strategy: Option<Strategy>,

    /// Substitute a rule engine result when the generative pipeline fails
    #[serde(default = "default_true")]
    pub fallback_to_rules: bool,

    /// Deadline for one backend call in milliseconds
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: Option<u64>,

    /// Longest accepted email in characters
    #[serde(default = "default_max_email_chars")]
    pub max_email_chars: usize,
}

#[allow(clippy::unnecessary_wraps)]
const fn default_deadline_ms() -> Option<u64> {
    Some(45_000)
}

const fn default_max_email_chars() -> usize {
    DEFAULT_MAX_EMAIL_CHARS
}

impl AnalysisAppConfig {
    /// Strategy to use when the caller does not pick one
    #[must_use]
    pub fn resolved_strategy(&self, backend_enabled: bool) -> Strategy {
        self.default_strategy.unwrap_or(if backend_enabled {
            Strategy::Generative
        } else {
            Strategy::RuleBased
        })
    }

    /// Orchestrator settings
    #[must_use]
    pub fn to_analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            fallback: if self.fallback_to_rules {
                FallbackPolicy::RuleEngine
            } else {
                FallbackPolicy::Disabled
            },
            max_email_chars: self.max_email_chars,
            default_deadline: self
                .deadline_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        }
    }
}

impl Default for AnalysisAppConfig {
    fn default() -> Self {
        Self {
            default_strategy: None,
            fallback_to_rules: true,
            deadline_ms: default_deadline_ms(),
            max_email_chars: default_max_email_chars(),
        }
    }
}
