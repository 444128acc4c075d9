//! Structured result of analysing one email

use serde::Serialize;

use crate::errors::DomainError;
use crate::value_objects::RiskLevel;

/// The five-field analysis of an email
///
/// Text fields are trimmed and never empty. The only way to build a record
/// is [`AnalysisRecord::new`], so a record in hand is always well formed.
/// Serialises with the camelCase wire names (`paymentDelayed`, `riskLevel`,
/// `suggestedAction`, `draftedReply`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    purpose: String,
    payment_delayed: bool,
    risk_level: RiskLevel,
    suggested_action: String,
    drafted_reply: String,
}

impl AnalysisRecord {
    /// Build a record, rejecting blank text fields
    pub fn new(
        purpose: impl Into<String>,
        payment_delayed: bool,
        risk_level: RiskLevel,
        suggested_action: impl Into<String>,
        drafted_reply: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            purpose: non_empty("purpose", purpose.into())?,
            payment_delayed,
            risk_level,
            suggested_action: non_empty("suggestedAction", suggested_action.into())?,
            drafted_reply: non_empty("draftedReply", drafted_reply.into())?,
        })
    }

    /// Short label of the email's intent
    #[must_use]
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Whether the email indicates a payment delay
    #[must_use]
    pub const fn payment_delayed(&self) -> bool {
        self.payment_delayed
    }

    /// Assessed risk
    #[must_use]
    pub const fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Recommended next step
    #[must_use]
    pub fn suggested_action(&self) -> &str {
        &self.suggested_action
    }

    /// Reply draft for human review
    #[must_use]
    pub fn drafted_reply(&self) -> &str {
        &self.drafted_reply
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}
