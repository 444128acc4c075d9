//! OpenAI-compatible chat completions client (OpenAI, Groq)

use async_trait::async_trait;
use domain::PromptText;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{BackendConfig, BackendProvider};
use crate::error::InferenceError;
use crate::http::{build_client, decode, ensure_success, require_text};
use crate::ports::{GenerationResponse, TextGenerator};

/// Generator for any OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiGenerator {
    client: Client,
    config: BackendConfig,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("provider", &self.config.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiGenerator {
    /// Create a new generator; `config.provider` decides the defaults (OpenAI or Groq)
    pub fn new(config: BackendConfig) -> Result<Self, InferenceError> {
        let client = build_client(config.timeout_ms)?;
        let base_url = config.resolved_base_url();
        let model = config.resolved_model();

        info!(
            provider = %config.provider,
            base_url = %base_url,
            model = %model,
            "Initialized chat completions generator"
        );

        Ok(Self {
            client,
            config,
            base_url,
            model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    #[instrument(skip(self, prompt), fields(provider = %self.config.provider, model = %self.model))]
    async fn generate(&self, prompt: &PromptText) -> Result<GenerationResponse, InferenceError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| InferenceError::InvalidConfig("missing api_key".to_string()))?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.config.resolved_temperature(),
            max_tokens: self.config.max_tokens,
        };

        debug!(prompt_chars = prompt.user.len(), "Sending chat completion request");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(e, self.config.timeout_ms))?;

        let response = ensure_success(response).await?;
        let body: ChatResponse = decode(response, self.config.timeout_ms).await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        let text = require_text(content)?;

        debug!(response_chars = text.len(), "Chat completion received");

        Ok(GenerationResponse {
            text,
            model: body.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    async fn health_check(&self) -> Result<bool, InferenceError> {
        Ok(self.config.api_key().is_some())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> BackendProvider {
        self.config.provider
    }
}
