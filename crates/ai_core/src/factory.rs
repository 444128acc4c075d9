//! Provider selection

use std::sync::Arc;

use tracing::info;

use crate::anthropic::AnthropicGenerator;
use crate::config::{BackendConfig, BackendProvider};
use crate::error::InferenceError;
use crate::gemini::GeminiGenerator;
use crate::ollama::OllamaGenerator;
use crate::openai::OpenAiGenerator;
use crate::ports::TextGenerator;

/// Build the generator selected by `config.provider`
///
/// Returns `Ok(None)` for [`BackendProvider::None`]. The configuration is
/// validated first, so a cloud provider without an API key fails here
/// rather than on the first request.
pub fn create_generator(
    config: &BackendConfig,
) -> Result<Option<Arc<dyn TextGenerator>>, InferenceError> {
    config.validate()?;

    let generator: Arc<dyn TextGenerator> = match config.provider {
        BackendProvider::None => {
            info!("No generative backend configured");
            return Ok(None);
        },
        BackendProvider::Anthropic => Arc::new(AnthropicGenerator::new(config.clone())?),
        BackendProvider::OpenAi | BackendProvider::Groq => {
            Arc::new(OpenAiGenerator::new(config.clone())?)
        },
        BackendProvider::Gemini => Arc::new(GeminiGenerator::new(config.clone())?),
        BackendProvider::Ollama => Arc::new(OllamaGenerator::new(config.clone())?),
    };

    Ok(Some(generator))
}
