//! AI Core - Generative text backends
//!
//! Each provider module only marshals a [`domain::PromptText`] into the
//! provider's wire format and hands back the raw completion text. No JSON
//! interpretation of the completion happens here.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod factory;
pub mod gemini;
mod http;
pub mod ollama;
pub mod openai;
pub mod ports;

pub use anthropic::AnthropicGenerator;
pub use config::{BackendConfig, BackendProvider};
pub use error::InferenceError;
pub use factory::create_generator;
pub use gemini::GeminiGenerator;
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use ports::{GenerationResponse, TextGenerator};
