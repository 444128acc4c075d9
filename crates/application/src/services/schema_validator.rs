//! Checks a parsed object against the analysis record shape
//!
//! No coercion: `"true"` is not a boolean and `"critical"` is not a risk
//! level. Unexpected extra keys are ignored.

use domain::{AnalysisRecord, DomainError, RiskLevel};
use serde_json::Value;

use crate::error::ValidationError;
use crate::services::response_parser::UnvalidatedStructure;

/// Wire names of the required fields, in check order
pub const REQUIRED_FIELDS: [&str; 5] = [
    "purpose",
    "paymentDelayed",
    "riskLevel",
    "suggestedAction",
    "draftedReply",
];

/// Validate a parsed object and build the record
///
/// Checks run in a fixed order: all keys present, `riskLevel` in range,
/// `paymentDelayed` boolean, text fields non-empty strings.
pub fn validate(structure: &UnvalidatedStructure) -> Result<AnalysisRecord, ValidationError> {
    for field in REQUIRED_FIELDS {
        if structure.get(field).is_none_or(Value::is_null) {
            return Err(ValidationError::MissingField(field));
        }
    }

    let risk_level = risk_level(structure)?;

    let payment_delayed = match structure.get("paymentDelayed") {
        Some(Value::Bool(flag)) => *flag,
        _ => return Err(ValidationError::WrongType("paymentDelayed")),
    };

    let purpose = text_field(structure, "purpose")?;
    let suggested_action = text_field(structure, "suggestedAction")?;
    let drafted_reply = text_field(structure, "draftedReply")?;

    AnalysisRecord::new(
        purpose,
        payment_delayed,
        risk_level,
        suggested_action,
        drafted_reply,
    )
    .map_err(|err| match err {
        DomainError::EmptyField(field) => ValidationError::EmptyField(field),
        DomainError::InvalidRiskLevel(value) => ValidationError::InvalidEnum("riskLevel", value),
        DomainError::InvalidSource(_) | DomainError::NotFound { .. } => {
            ValidationError::WrongType("purpose")
        },
    })
}

fn risk_level(structure: &UnvalidatedStructure) -> Result<RiskLevel, ValidationError> {
    match structure.get("riskLevel") {
        Some(Value::String(raw)) => RiskLevel::parse(raw)
            .map_err(|_| ValidationError::InvalidEnum("riskLevel", raw.clone())),
        _ => Err(ValidationError::WrongType("riskLevel")),
    }
}

fn text_field<'a>(
    structure: &'a UnvalidatedStructure,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match structure.get(field) {
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err(ValidationError::EmptyField(field))
        },
        Some(Value::String(text)) => Ok(text),
        _ => Err(ValidationError::WrongType(field)),
    }
}
