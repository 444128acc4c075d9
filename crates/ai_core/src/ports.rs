//! Port definitions for generative backends

use async_trait::async_trait;
use domain::PromptText;

use crate::config::BackendProvider;
use crate::error::InferenceError;

/// Raw completion returned by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    /// Completion text exactly as received
    pub text: String,
    /// Model that produced it, as reported by the backend when available
    pub model: String,
}

/// Capability to turn a prompt into free text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the raw completion
    async fn generate(&self, prompt: &PromptText) -> Result<GenerationResponse, InferenceError>;

    /// Cheap reachability check
    async fn health_check(&self) -> Result<bool, InferenceError>;

    /// Configured model identifier
    fn model(&self) -> &str;

    /// Provider behind this generator
    fn provider(&self) -> BackendProvider;
}
