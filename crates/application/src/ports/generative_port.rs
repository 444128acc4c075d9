//! Generative backend port - "produce free text given a prompt"

use async_trait::async_trait;
use domain::PromptText;
#[cfg(test)]
use mockall::automock;

use crate::error::BackendError;

/// Raw completion text and the model that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    /// Completion exactly as received, no trimming
    pub text: String,
    /// Model identifier
    pub model: String,
}

/// Port for generative text backends
///
/// Implementations only marshal the prompt and return the completion.
/// They never interpret the text as JSON.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerativePort: Send + Sync {
    /// Send one prompt and return the raw completion
    async fn generate(&self, prompt: &PromptText) -> Result<GeneratedText, BackendError>;

    /// Whether the backend looks reachable
    async fn is_healthy(&self) -> bool;

    /// Configured model identifier
    fn model_name(&self) -> String;
}
