//! Google Gemini `generateContent` client

use async_trait::async_trait;
use domain::PromptText;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{BackendConfig, BackendProvider};
use crate::error::InferenceError;
use crate::http::{build_client, decode, ensure_success, require_text};
use crate::ports::{GenerationResponse, TextGenerator};

/// Generator backed by the Gemini API
pub struct GeminiGenerator {
    client: Client,
    config: BackendConfig,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiGenerator {
    /// Create a new Gemini generator
    pub fn new(config: BackendConfig) -> Result<Self, InferenceError> {
        let client = build_client(config.timeout_ms)?;
        let base_url = config.resolved_base_url();
        let model = config.resolved_model();

        info!(base_url = %base_url, model = %model, "Initialized Gemini generator");

        Ok(Self {
            client,
            config,
            base_url,
            model,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn first_candidate_text(candidates: Vec<Candidate>) -> Option<String> {
    let parts = candidates.into_iter().next()?.content?.parts;
    let texts: Vec<String> = parts.into_iter().filter_map(|part| part.text).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &PromptText) -> Result<GenerationResponse, InferenceError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| InferenceError::InvalidConfig("missing api_key".to_string()))?;

        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: &prompt.system,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: &prompt.user }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.resolved_temperature(),
                max_output_tokens: self.config.max_tokens,
            },
        };

        debug!(prompt_chars = prompt.user.len(), "Sending request to Gemini");

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(e, self.config.timeout_ms))?;

        let response = ensure_success(response).await?;
        let body: GenerateResponse = decode(response, self.config.timeout_ms).await?;
        let text = require_text(first_candidate_text(body.candidates))?;

        debug!(response_chars = text.len(), "Gemini completion received");

        Ok(GenerationResponse {
            text,
            model: body.model_version.unwrap_or_else(|| self.model.clone()),
        })
    }

    async fn health_check(&self) -> Result<bool, InferenceError> {
        Ok(self.config.api_key().is_some())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> BackendProvider {
        BackendProvider::Gemini
    }
}
