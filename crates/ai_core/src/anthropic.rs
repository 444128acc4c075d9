//! Anthropic Messages API client

use async_trait::async_trait;
use domain::PromptText;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{BackendConfig, BackendProvider};
use crate::error::InferenceError;
use crate::http::{build_client, decode, ensure_success, require_text};
use crate::ports::{GenerationResponse, TextGenerator};

/// Pinned Messages API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Generator backed by the Anthropic Messages API
pub struct AnthropicGenerator {
    client: Client,
    config: BackendConfig,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for AnthropicGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AnthropicGenerator {
    /// Create a new Anthropic generator
    pub fn new(config: BackendConfig) -> Result<Self, InferenceError> {
        let client = build_client(config.timeout_ms)?;
        let base_url = config.resolved_base_url();
        let model = config.resolved_model();

        info!(base_url = %base_url, model = %model, "Initialized Anthropic generator");

        Ok(Self {
            client,
            config,
            base_url,
            model,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

fn collect_text(blocks: Vec<ContentBlock>) -> Option<String> {
    let texts: Vec<String> = blocks
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &PromptText) -> Result<GenerationResponse, InferenceError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| InferenceError::InvalidConfig("missing api_key".to_string()))?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.resolved_temperature(),
            system: &prompt.system,
            messages: [Message {
                role: "user",
                content: &prompt.user,
            }],
        };

        debug!(prompt_chars = prompt.user.len(), "Sending request to Anthropic");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(e, self.config.timeout_ms))?;

        let response = ensure_success(response).await?;
        let body: MessagesResponse = decode(response, self.config.timeout_ms).await?;
        let text = require_text(collect_text(body.content))?;

        debug!(response_chars = text.len(), "Anthropic completion received");

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
        BackendProvider::Anthropic
    }
}
