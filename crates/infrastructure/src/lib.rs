//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the generative
//! backend adapter, SQLite analysis history, Tera report rendering,
//! configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;
pub mod templates;

pub use adapters::*;
pub use config::{
    AnalysisAppConfig, AppConfig, DatabaseConfig, LogFormat, ReportConfig, ServerConfig,
};
pub use persistence::{ConnectionPool, DatabaseError, SqliteAnalysisStore, create_pool};
pub use telemetry::{DEFAULT_LOG_FILTER, TelemetryError, init_logging};
pub use templates::{TemplateError, TeraReportRenderer};
