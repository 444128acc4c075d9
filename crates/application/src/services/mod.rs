//! Application services - Use case implementations

mod analysis_service;
mod history_service;
mod prompt_builder;
pub mod response_parser;
mod report_service;
mod rule_engine;
pub mod schema_validator;

pub use analysis_service::{
    AnalysisConfig, AnalysisOutcome, AnalysisService, AnalyzeOptions, DEFAULT_MAX_EMAIL_CHARS,
    FallbackPolicy, Strategy,
};
pub use history_service::{DEFAULT_HISTORY_LIMIT, HistoryService, MAX_HISTORY_LIMIT};
pub use prompt_builder::PromptBuilder;
pub use report_service::ReportService;
pub use response_parser::UnvalidatedStructure;
pub use rule_engine::RuleEngine;
