//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `analysis`: orchestrator strategy, fallback and limits
//! - `database`: SQLite database settings
//! - `report`: report header settings
//!
//! The generative backend section reuses [`ai_core::BackendConfig`].

mod analysis;
mod database;
mod report;
mod server;

use std::path::Path;

use ai_core::BackendConfig;
use application::ApplicationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use analysis::AnalysisAppConfig;
pub use database::DatabaseConfig;
pub use report::ReportConfig;
pub use server::{LogFormat, ServerConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SUPPLYSYNC";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Generative backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Analysis orchestration
    #[serde(default)]
    pub analysis: AnalysisAppConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Report rendering
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `file` instead of `config.toml` when given
    ///
    /// An explicit file must exist; the default one is optional.
    pub fn load_from(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("backend.provider", "none")?
            // Load from file if exists
            .add_source(file_source)
            // Override with environment variables (e.g., SUPPLYSYNC__BACKEND__PROVIDER)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let app_config: Self = config.try_deserialize()?;
        debug!(
            provider = %app_config.backend.provider,
            database = %app_config.database.path,
            "Configuration loaded"
        );
        Ok(app_config)
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.backend
            .validate()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        if self.analysis.max_email_chars == 0 {
            return Err(ApplicationError::Configuration(
                "analysis.max_email_chars must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ApplicationError::Configuration(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        if self.server.max_body_size_bytes == 0 {
            return Err(ApplicationError::Configuration(
                "server.max_body_size_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Strategy for requests that name none
    #[must_use]
    pub fn default_strategy(&self) -> application::Strategy {
        self.analysis.resolved_strategy(self.backend.is_enabled())
    }
}
