//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{AnalysisRecord, AnalysisSource, DomainError, EmailText, RiskLevel};
use proptest::prelude::*;

// ============================================================================
// RiskLevel Property Tests
// ============================================================================

mod risk_level_tests {
    use super::*;

    fn any_risk_level() -> impl Strategy<Value = RiskLevel> {
        prop_oneof![
            Just(RiskLevel::Low),
            Just(RiskLevel::Medium),
            Just(RiskLevel::High)
        ]
    }

    proptest! {
        #[test]
        fn parse_ignores_case_and_padding(
            level in any_risk_level(),
            upper in any::<bool>(),
            pad in "[ \t\n]{0,3}"
        ) {
            let text = if upper { level.as_str().to_uppercase() } else { level.as_str().to_string() };
            prop_assert_eq!(RiskLevel::parse(&format!("{pad}{text}{pad}")).unwrap(), level);
        }

        #[test]
        fn unknown_values_keep_original_text(value in "[a-z]{1,12}") {
            prop_assume!(!["low", "medium", "high"].contains(&value.as_str()));
            prop_assert_eq!(
                RiskLevel::parse(&value),
                Err(DomainError::InvalidRiskLevel(value.clone()))
            );
        }
    }
}

// ============================================================================
// AnalysisRecord Property Tests
// ============================================================================

mod analysis_record_tests {
    use super::*;

    proptest! {
        #[test]
        fn blank_text_never_builds_a_record(blank in "[ \t\r\n]{0,8}") {
            let result = AnalysisRecord::new("Invoice", false, RiskLevel::Low, "Pay", blank);
            prop_assert_eq!(result, Err(DomainError::EmptyField("draftedReply")));
        }

        #[test]
        fn stored_text_is_trimmed(core in "[a-zA-Z0-9]{1,20}", pad in "[ \n]{0,4}") {
            let record = AnalysisRecord::new(
                format!("{pad}{core}{pad}"),
                true,
                RiskLevel::High,
                "act",
                "reply",
            )
            .unwrap();
            prop_assert_eq!(record.purpose(), core.as_str());
        }
    }
}

// ============================================================================
// EmailText / AnalysisSource Property Tests
// ============================================================================

mod misc_tests {
    use super::*;

    proptest! {
        #[test]
        fn first_line_is_never_blank(text in any::<String>()) {
            if let Some(line) = EmailText::new(text).first_line() {
                prop_assert!(!line.is_empty());
            }
        }

        #[test]
        fn fallback_source_roundtrips_through_parts(reason in ".{0,40}") {
            let source = AnalysisSource::RuleFallback { reason };
            let rebuilt = AnalysisSource::from_parts(source.kind(), source.detail().map(str::to_string)).unwrap();
            prop_assert_eq!(rebuilt, source);
        }
    }
}
