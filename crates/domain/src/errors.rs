//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A text field was empty after trimming
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Value is not one of the allowed risk levels
    #[error("Invalid risk level: {0}")]
    InvalidRiskLevel(String),

    /// Analysis source tag could not be recognised
    #[error("Invalid analysis source: {0}")]
    InvalidSource(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}
