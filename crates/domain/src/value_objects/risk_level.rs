//! Risk level value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Risk level assigned to an analysed email
///
/// Ordered `Low < Medium < High`. The wire form is always lowercase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Nothing urgent
    #[default]
    Low,
    /// Needs a look (pending review, delayed payment)
    Medium,
    /// Urgent or overdue
    High,
}

impl RiskLevel {
    /// Canonical lowercase representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a risk level, ignoring case and surrounding whitespace
    ///
    /// Unknown values are rejected rather than mapped to a default.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidRiskLevel(value.to_string())),
        }
    }

    /// All risk levels in ascending order
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(RiskLevel::parse("HIGH").unwrap(), RiskLevel::High);
        assert_eq!(RiskLevel::parse("Medium").unwrap(), RiskLevel::Medium);
        assert_eq!(RiskLevel::parse(" low ").unwrap(), RiskLevel::Low);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = RiskLevel::parse("critical").unwrap_err();
        assert_eq!(err, DomainError::InvalidRiskLevel("critical".to_string()));
    }

    #[test]
    fn ordering_is_ascending() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
    }

    #[test]
    fn display_matches_wire_form() {
        for level in RiskLevel::all() {
            assert_eq!(level.to_string(), level.as_str());
        }
    }
}
