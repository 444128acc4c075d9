//! Application-level errors
//!
//! The analysis pipeline has one error type per stage. [`AnalysisError`]
//! collects them so the caller can see which stage failed.

use domain::DomainError;
use thiserror::Error;

/// Failure of the generative backend call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The call could not complete (network, timeout, auth, rate limit, cancellation)
    #[error("Generative backend unavailable: {0}")]
    Unavailable(String),

    /// The call completed but produced no text
    #[error("Generative backend returned an empty response")]
    EmptyResponse,
}

/// Failure to extract a structured object from raw backend text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// No balanced `{ ... }` region exists in the text
    #[error("No JSON object found in backend response")]
    NoStructureFound,

    /// A balanced region exists but is not a valid JSON object
    #[error("Malformed JSON object in backend response: {0}")]
    MalformedStructure(String),
}

/// A parsed object that does not satisfy the analysis record shape
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Required key absent (or null)
    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    /// Value outside the allowed set; carries the value verbatim
    #[error("Field '{0}' has unsupported value '{1}'")]
    InvalidEnum(&'static str, String),

    /// Value has the wrong JSON type
    #[error("Field '{0}' has the wrong type")]
    WrongType(&'static str),

    /// Text field empty after trimming
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),
}

impl ValidationError {
    /// Failure kind and field name only, never the offending value
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::MissingField(field) => format!("missing field {field}"),
            Self::InvalidEnum(field, _) => format!("invalid enum in {field}"),
            Self::WrongType(field) => format!("wrong type in {field}"),
            Self::EmptyField(field) => format!("empty field {field}"),
        }
    }
}

/// Pipeline stage at which an analysis failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    /// Input rejected before any strategy ran
    Input,
    /// Generative backend call
    Generation,
    /// Extracting structure from raw text
    Parsing,
    /// Checking the structure against the record shape
    Validation,
}

impl AnalysisStage {
    /// Lowercase stage name for logs and error codes
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Generation => "generation",
            Self::Parsing => "parsing",
            Self::Validation => "validation",
        }
    }
}

/// Classified failure of one analysis call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Email longer than the configured limit
    #[error("Email has {actual} characters, limit is {limit}")]
    InputTooLarge { limit: usize, actual: usize },
}

impl AnalysisError {
    /// Stage that produced this error
    #[must_use]
    pub const fn stage(&self) -> AnalysisStage {
        match self {
            Self::Backend(_) => AnalysisStage::Generation,
            Self::Parse(_) => AnalysisStage::Parsing,
            Self::Validation(_) => AnalysisStage::Validation,
            Self::InputTooLarge { .. } => AnalysisStage::Input,
        }
    }

    /// Short reason recorded on a degraded (rule fallback) result
    #[must_use]
    pub fn fallback_reason(&self) -> String {
        match self {
            Self::Backend(BackendError::Unavailable(_)) => "backend unavailable".to_string(),
            Self::Backend(BackendError::EmptyResponse) => "backend empty response".to_string(),
            Self::Parse(ParseError::NoStructureFound) => "no structure found".to_string(),
            Self::Parse(ParseError::MalformedStructure(_)) => "malformed structure".to_string(),
            Self::Validation(err) => format!("validation failed: {}", err.summary()),
            Self::InputTooLarge { .. } => "input too large".to_string(),
        }
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Analysis pipeline error
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Report rendering failed
    #[error("Rendering failed: {0}")]
    Rendering(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (storage, task join, ...)
    #[error("Internal error: {0}")]
    Internal(String),
}
