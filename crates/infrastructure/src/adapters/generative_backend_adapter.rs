//! Generative backend adapter - Implements GenerativePort using ai_core
//!
//! Works with any provider `ai_core::create_generator` can build:
//! Anthropic, OpenAI, Groq, Gemini and Ollama.

use std::sync::Arc;
use std::time::Instant;

use ai_core::{BackendConfig, InferenceError, TextGenerator, create_generator};
use application::{
    error::{ApplicationError, BackendError},
    ports::{GeneratedText, GenerativePort},
};
use async_trait::async_trait;
use domain::PromptText;
use tracing::{debug, info, instrument, warn};

/// Adapter from a provider client to the orchestrator's backend port
pub struct GenerativeBackendAdapter {
    generator: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for GenerativeBackendAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeBackendAdapter")
            .field("provider", &self.generator.provider())
            .field("model", &self.generator.model())
            .finish()
    }
}

impl GenerativeBackendAdapter {
    /// Wrap an existing provider client
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Build the adapter for the configured provider
    ///
    /// Returns `Ok(None)` when the provider is `none`.
    pub fn from_config(config: &BackendConfig) -> Result<Option<Self>, ApplicationError> {
        let generator = create_generator(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        Ok(generator.map(|generator| {
            info!(
                provider = %generator.provider(),
                model = %generator.model(),
                "Generative backend configured"
            );
            Self::new(generator)
        }))
    }

    /// Convert ai_core error to backend error
    fn map_error(e: InferenceError) -> BackendError {
        match e {
            InferenceError::EmptyResponse => BackendError::EmptyResponse,
            other => BackendError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl GenerativePort for GenerativeBackendAdapter {
    #[instrument(skip(self, prompt), fields(provider = %self.generator.provider(), prompt_len = prompt.user.len()))]
    async fn generate(&self, prompt: &PromptText) -> Result<GeneratedText, BackendError> {
        let start = Instant::now();

        let response = self.generator.generate(prompt).await.map_err(|e| {
            warn!(error = %e, "Generative backend call failed");
            Self::map_error(e)
        })?;

        debug!(
            model = %response.model,
            response_len = response.text.len(),
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Generative backend responded"
        );

        Ok(GeneratedText {
            text: response.text,
            model: response.model,
        })
    }

    async fn is_healthy(&self) -> bool {
        match self.generator.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Generative backend health check failed");
                false
            },
        }
    }

    fn model_name(&self) -> String {
        self.generator.model().to_string()
    }
}
