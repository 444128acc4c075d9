//! Ollama chat client

use std::time::Duration;

use async_trait::async_trait;
use domain::PromptText;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{BackendConfig, BackendProvider};
use crate::error::InferenceError;
use crate::http::{build_client, decode, ensure_success, require_text};
use crate::ports::{GenerationResponse, TextGenerator};

/// Generator backed by a local Ollama server
pub struct OllamaGenerator {
    client: Client,
    config: BackendConfig,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OllamaGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OllamaGenerator {
    /// Create a new Ollama generator
    pub fn new(config: BackendConfig) -> Result<Self, InferenceError> {
        let client = build_client(config.timeout_ms)?;
        let base_url = config.resolved_base_url();
        let model = config.resolved_model();

        info!(base_url = %base_url, model = %model, "Initialized Ollama generator");

        Ok(Self {
            client,
            config,
            base_url,
            model,
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [OllamaMessage<'a>; 2],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &PromptText) -> Result<GenerationResponse, InferenceError> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: [
                OllamaMessage {
                    role: "system",
                    content: &prompt.system,
                },
                OllamaMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.resolved_temperature(),
                num_predict: self.config.max_tokens,
            },
        };

        debug!(prompt_chars = prompt.user.len(), "Sending request to Ollama");

        let response = self
            .client
            .post(self.api_url("chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(e, self.config.timeout_ms))?;

        let response = ensure_success(response).await?;
        let body: OllamaChatResponse = decode(response, self.config.timeout_ms).await?;
        let text = require_text(body.message.content)?;

        debug!(response_chars = text.len(), "Ollama completion received");

        Ok(GenerationResponse {
            text,
            model: body.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, InferenceError> {
        let response = self
            .client
            .get(self.api_url("tags"))
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) if e.is_timeout() || e.is_connect() => Ok(false),
            Err(e) => Err(InferenceError::RequestFailed(e.to_string())),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> BackendProvider {
        BackendProvider::Ollama
    }
}
