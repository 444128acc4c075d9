//! Analysis orchestrator
//!
//! Public entry point of the engine. Runs either the rule engine or the
//! generative pipeline (prompt, one backend call, parse, validate) and
//! reports which strategy produced the result. Holds no per-call state;
//! concurrent calls are independent.

use std::sync::Arc;
use std::time::Duration;

use domain::{AnalysisRecord, AnalysisSource, EmailText};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::{AnalysisError, BackendError};
use crate::ports::{GeneratedText, GenerativePort};
use crate::services::prompt_builder::PromptBuilder;
use crate::services::response_parser;
use crate::services::rule_engine::RuleEngine;
use crate::services::schema_validator;

/// Default upper bound on email length in characters
pub const DEFAULT_MAX_EMAIL_CHARS: usize = 50_000;

/// How to produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Deterministic keyword classifier
    RuleBased,
    /// Prompt a generative backend and validate its answer
    Generative,
}

impl Strategy {
    /// Configuration name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::Generative => "generative",
        }
    }
}

/// What to do when the generative pipeline fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Return the classified error
    Disabled,
    /// Substitute a rule engine record tagged as [`AnalysisSource::RuleFallback`]
    #[default]
    RuleEngine,
}

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Behaviour on generative failure
    pub fallback: FallbackPolicy,
    /// Longest accepted email, in characters
    pub max_email_chars: usize,
    /// Deadline for the backend call when the caller supplies none
    pub default_deadline: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackPolicy::default(),
            max_email_chars: DEFAULT_MAX_EMAIL_CHARS,
            default_deadline: None,
        }
    }
}

/// Per-call controls for the backend call
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Overrides [`AnalysisConfig::default_deadline`]
    pub deadline: Option<Duration>,
    /// Cancels the backend call when triggered
    pub cancellation: Option<CancellationToken>,
}

impl AnalyzeOptions {
    /// Options with a deadline
    #[must_use]
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            cancellation: None,
        }
    }

    /// Attach a cancellation token
    #[must_use]
    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// A record together with the strategy that actually produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// The validated record
    pub record: AnalysisRecord,
    /// Provenance
    pub source: AnalysisSource,
}

/// Analysis orchestrator
pub struct AnalysisService {
    backend: Option<Arc<dyn GenerativePort>>,
    rules: RuleEngine,
    prompts: PromptBuilder,
    config: AnalysisConfig,
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("has_backend", &self.backend.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnalysisService {
    /// Create an orchestrator; `backend` is `None` when no provider is configured
    #[must_use]
    pub fn new(backend: Option<Arc<dyn GenerativePort>>, config: AnalysisConfig) -> Self {
        Self {
            backend,
            rules: RuleEngine::new(),
            prompts: PromptBuilder::new(),
            config,
        }
    }

    /// Orchestrator with no generative backend
    #[must_use]
    pub fn rules_only(config: AnalysisConfig) -> Self {
        Self::new(None, config)
    }

    /// Whether a generative backend is wired in
    #[must_use]
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Generative when a backend exists, rule based otherwise
    #[must_use]
    pub fn preferred_strategy(&self) -> Strategy {
        if self.has_backend() {
            Strategy::Generative
        } else {
            Strategy::RuleBased
        }
    }

    /// Backend health; `false` when none is configured
    pub async fn backend_healthy(&self) -> bool {
        match &self.backend {
            Some(backend) => backend.is_healthy().await,
            None => false,
        }
    }

    /// Configured model, if a backend is wired in
    #[must_use]
    pub fn backend_model(&self) -> Option<String> {
        self.backend.as_ref().map(|backend| backend.model_name())
    }

    /// Analyse one email with default options
    pub async fn analyze(
        &self,
        email: &EmailText,
        strategy: Strategy,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        self.analyze_with(email, strategy, &AnalyzeOptions::default())
            .await
    }

    /// Analyse one email with a deadline and/or cancellation token
    #[instrument(skip(self, email, options), fields(strategy = strategy.as_str(), email_chars = tracing::field::Empty))]
    pub async fn analyze_with(
        &self,
        email: &EmailText,
        strategy: Strategy,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let chars = email.char_count();
        tracing::Span::current().record("email_chars", chars);

        if chars > self.config.max_email_chars {
            warn!(limit = self.config.max_email_chars, "Email rejected as too large");
            return Err(AnalysisError::InputTooLarge {
                limit: self.config.max_email_chars,
                actual: chars,
            });
        }

        let outcome = match strategy {
            Strategy::RuleBased => AnalysisOutcome {
                record: self.rules.classify(email),
                source: AnalysisSource::Rules,
            },
            Strategy::Generative => match self.run_generative(email, options).await {
                Ok(outcome) => outcome,
                Err(err) => self.handle_failure(email, err)?,
            },
        };

        info!(
            source = outcome.source.kind(),
            risk_level = %outcome.record.risk_level(),
            "Analysis completed"
        );
        Ok(outcome)
    }

    fn handle_failure(
        &self,
        email: &EmailText,
        err: AnalysisError,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        debug!(error = %err, "Generative pipeline error detail");
        match self.config.fallback {
            FallbackPolicy::Disabled => {
                warn!(
                    stage = err.stage().as_str(),
                    reason = %err.fallback_reason(),
                    "Generative analysis failed"
                );
                Err(err)
            },
            FallbackPolicy::RuleEngine => {
                let reason = err.fallback_reason();
                warn!(
                    stage = err.stage().as_str(),
                    reason = %reason,
                    "Generative analysis failed, falling back to rule engine"
                );
                Ok(AnalysisOutcome {
                    record: self.rules.classify(email),
                    source: AnalysisSource::RuleFallback { reason },
                })
            },
        }
    }

    async fn run_generative(
        &self,
        email: &EmailText,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            BackendError::Unavailable("no generative backend configured".to_string())
        })?;

        let prompt = self.prompts.build(email);
        let generated = self.call_backend(backend.as_ref(), &prompt, options).await?;
        debug!(response_chars = generated.text.len(), "Backend responded");

        let structure = response_parser::parse(&generated.text)?;
        let record = schema_validator::validate(&structure)?;

        Ok(AnalysisOutcome {
            record,
            source: AnalysisSource::Model {
                model: generated.model,
            },
        })
    }

    /// Exactly one backend call, bounded by deadline and cancellation
    async fn call_backend(
        &self,
        backend: &dyn GenerativePort,
        prompt: &domain::PromptText,
        options: &AnalyzeOptions,
    ) -> Result<GeneratedText, BackendError> {
        let deadline = options.deadline.or(self.config.default_deadline);

        let bounded = async {
            match deadline {
                Some(limit) => tokio::time::timeout(limit, backend.generate(prompt))
                    .await
                    .unwrap_or_else(|_| {
                        Err(BackendError::Unavailable(format!(
                            "deadline of {}ms exceeded",
                            limit.as_millis()
                        )))
                    }),
                None => backend.generate(prompt).await,
            }
        };

        match &options.cancellation {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    Err(BackendError::Unavailable("analysis cancelled".to_string()))
                }
                result = bounded => result,
            },
            None => bounded.await,
        }
    }
}
