//! Configuration for generative backends

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Which generative provider to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// Anthropic Messages API
    Anthropic,
    /// OpenAI chat completions
    #[serde(rename = "openai")]
    OpenAi,
    /// Groq (OpenAI-compatible chat completions)
    Groq,
    /// Google Gemini `generateContent`
    Gemini,
    /// Local Ollama server
    Ollama,
    /// No generative backend; only the rule engine is available
    #[default]
    None,
}

impl BackendProvider {
    /// Configuration name of the provider
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::None => "none",
        }
    }

    /// Default API root for this provider
    #[must_use]
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::Ollama => "http://localhost:11434",
            Self::None => "",
        }
    }

    /// Default model for this provider
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-haiku-20240307",
            Self::OpenAi => "gpt-4o-mini",
            Self::Groq => "llama-3.3-70b-versatile",
            Self::Gemini => "gemini-1.5-flash",
            Self::Ollama => "llama3.2",
            Self::None => "",
        }
    }

    /// Default sampling temperature
    #[must_use]
    pub const fn default_temperature(&self) -> f32 {
        match self {
            Self::Anthropic => 0.0,
            _ => 0.3,
        }
    }

    /// Whether an API key is mandatory
    #[must_use]
    pub const fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama | Self::None)
    }
}

impl fmt::Display for BackendProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the generative backend
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: BackendProvider,

    /// API key (sensitive)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API root; provider default when absent
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model identifier; provider default when absent
    #[serde(default)]
    pub model: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; provider default when absent
    #[serde(default)]
    pub temperature: Option<f32>,
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_max_tokens() -> u32 {
    1000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            api_key: None,
            base_url: None,
            model: None,
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl BackendConfig {
    /// Config for a provider with everything else defaulted
    #[must_use]
    pub fn for_provider(provider: BackendProvider) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Set the API root
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Effective API root without a trailing slash
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Effective model identifier
    #[must_use]
    pub fn resolved_model(&self) -> String {
        self.model
            .as_deref()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
            .to_string()
    }

    /// Effective sampling temperature
    #[must_use]
    pub fn resolved_temperature(&self) -> f32 {
        self.temperature
            .unwrap_or_else(|| self.provider.default_temperature())
    }

    /// Exposed API key, if one is configured and non-blank
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether a generative backend is configured at all
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider != BackendProvider::None
    }

    /// Reject configurations that cannot work
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.provider.requires_api_key() && self.api_key().is_none() {
            return Err(InferenceError::InvalidConfig(format!(
                "provider '{}' requires an api_key",
                self.provider
            )));
        }
        if self.timeout_ms == 0 {
            return Err(InferenceError::InvalidConfig(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(InferenceError::InvalidConfig(
                "max_tokens must be greater than zero".to_string(),
            ));
        }
        let temperature = self.resolved_temperature();
        if !(0.0..=2.0).contains(&temperature) {
            return Err(InferenceError::InvalidConfig(format!(
                "temperature {temperature} is outside 0.0..=2.0"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_backend() {
        let config = BackendConfig::default();
        assert_eq!(config.provider, BackendProvider::None);
        assert!(!config.is_enabled());
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.max_tokens, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn provider_defaults_are_resolved() {
        let config = BackendConfig::for_provider(BackendProvider::Groq).with_api_key("k");
        assert_eq!(config.resolved_model(), "llama-3.3-70b-versatile");
        assert_eq!(config.resolved_base_url(), "https://api.groq.com/openai/v1");
        assert!((config.resolved_temperature() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn anthropic_defaults_to_zero_temperature() {
        let config = BackendConfig::for_provider(BackendProvider::Anthropic);
        assert!(config.resolved_temperature().abs() < f32::EPSILON);
        assert_eq!(config.resolved_model(), "claude-3-haiku-20240307");
    }

    #[test]
    fn overrides_win_over_defaults() {
        let config = BackendConfig::for_provider(BackendProvider::Ollama)
            .with_base_url("http://gpu-box:11434/")
            .with_model("qwen2.5");
        assert_eq!(config.resolved_base_url(), "http://gpu-box:11434");
        assert_eq!(config.resolved_model(), "qwen2.5");
    }

    #[test]
    fn cloud_provider_without_key_is_rejected() {
        let config = BackendConfig::for_provider(BackendProvider::Anthropic);
        assert!(matches!(
            config.validate(),
            Err(InferenceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = BackendConfig::for_provider(BackendProvider::OpenAi).with_api_key("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = BackendConfig::for_provider(BackendProvider::Ollama);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = BackendConfig::for_provider(BackendProvider::Ollama);
        config.temperature = Some(3.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = BackendConfig::for_provider(BackendProvider::Gemini).with_api_key("sk-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn serialization_skips_api_key() {
        let config = BackendConfig::for_provider(BackendProvider::Groq).with_api_key("sk-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("\"provider\":\"groq\""));
    }

    #[test]
    fn deserializes_provider_names() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"provider":"openai","api_key":"k"}"#).unwrap();
        assert_eq!(config.provider, BackendProvider::OpenAi);
        assert_eq!(config.api_key(), Some("k"));
        assert_eq!(config.timeout_ms, 30_000);
    }
}
