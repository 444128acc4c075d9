//! Deterministic keyword classifier
//!
//! Always available and total: any input, including the empty string,
//! yields a well-formed [`AnalysisRecord`]. Matching is ASCII
//! case-insensitive substring search; purchase order triggers must also
//! start at a word boundary so "typo " is not read as "PO ".

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use domain::{AnalysisRecord, EmailText, Purpose, RiskLevel};

const PURCHASE_ORDER_TRIGGERS: &[&str] = &["purchase order", "po "];
const COMPLIANCE_TRIGGERS: &[&str] = &["compliance", "audit"];
const INVOICE_TRIGGERS: &[&str] = &["invoice", "payment"];
const DELAY_TRIGGERS: &[&str] = &["delay", "late", "overdue"];
const HIGH_RISK_TRIGGERS: &[&str] = &["urgent", "immediate", "overdue"];
const MEDIUM_RISK_TRIGGERS: &[&str] = &["review", "pending"];

/// Longest subject carried into the reply's `Re:` line
const MAX_SUBJECT_CHARS: usize = 100;

fn matcher(patterns: &[&str]) -> AhoCorasick {
    #[allow(clippy::expect_used)] // Infallible with valid static patterns
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(patterns)
        .expect("Failed to build keyword matcher")
}

static PURCHASE_ORDER: LazyLock<AhoCorasick> = LazyLock::new(|| matcher(PURCHASE_ORDER_TRIGGERS));
static COMPLIANCE: LazyLock<AhoCorasick> = LazyLock::new(|| matcher(COMPLIANCE_TRIGGERS));
static INVOICE: LazyLock<AhoCorasick> = LazyLock::new(|| matcher(INVOICE_TRIGGERS));
static DELAY: LazyLock<AhoCorasick> = LazyLock::new(|| matcher(DELAY_TRIGGERS));
static HIGH_RISK: LazyLock<AhoCorasick> = LazyLock::new(|| matcher(HIGH_RISK_TRIGGERS));
static MEDIUM_RISK: LazyLock<AhoCorasick> = LazyLock::new(|| matcher(MEDIUM_RISK_TRIGGERS));

/// Keyword-based classifier producing a complete analysis record
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    /// Create a rule engine
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Classify an email
    #[must_use]
    pub fn classify(&self, email: &EmailText) -> AnalysisRecord {
        let text = email.as_str();
        let purpose = Self::purpose(text);
        let payment_delayed = DELAY.is_match(text);
        let risk_level = Self::risk_level(text, payment_delayed);
        let suggested_action = Self::suggested_action(purpose, payment_delayed);
        let drafted_reply = Self::drafted_reply(email, purpose, payment_delayed);

        #[allow(clippy::expect_used)] // Every template line is non-empty
        AnalysisRecord::new(
            purpose.label(),
            payment_delayed,
            risk_level,
            suggested_action,
            drafted_reply,
        )
        .expect("rule templates produce non-empty text")
    }

    /// First match in priority order wins
    fn purpose(text: &str) -> Purpose {
        if starts_at_word(&PURCHASE_ORDER, text) {
            Purpose::PurchaseOrder
        } else if COMPLIANCE.is_match(text) {
            Purpose::ComplianceRequest
        } else if INVOICE.is_match(text) {
            Purpose::Invoice
        } else {
            Purpose::GeneralInquiry
        }
    }

    fn risk_level(text: &str, payment_delayed: bool) -> RiskLevel {
        if HIGH_RISK.is_match(text) {
            RiskLevel::High
        } else if payment_delayed || MEDIUM_RISK.is_match(text) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn suggested_action(purpose: Purpose, payment_delayed: bool) -> &'static str {
        match purpose {
            Purpose::PurchaseOrder => "Acknowledge receipt and confirm delivery dates.",
            Purpose::ComplianceRequest => {
                "Review the compliance requirements and gather the requested documentation."
            },
            Purpose::Invoice => "Check payment terms and prepare for payment.",
            Purpose::GeneralInquiry if payment_delayed => {
                "Follow up with accounts payable to resolve delay."
            },
            Purpose::GeneralInquiry => "Monitor and respond appropriately.",
        }
    }

    fn purpose_sentence(purpose: Purpose) -> &'static str {
        match purpose {
            Purpose::PurchaseOrder => {
                "We acknowledge receipt of your purchase order and will begin processing."
            },
            Purpose::ComplianceRequest => {
                "We have received your compliance request and will provide the requested information shortly."
            },
            Purpose::Invoice => {
                "We have received your invoice and will process it according to our payment terms."
            },
            Purpose::GeneralInquiry => "We will review your request and get back to you shortly.",
        }
    }

    fn subject(email: &EmailText) -> String {
        let line = email.first_line().unwrap_or_default();
        let line = strip_subject_prefix(line).trim();
        if line.is_empty() {
            return "Your email".to_string();
        }
        line.chars().take(MAX_SUBJECT_CHARS).collect()
    }

    fn drafted_reply(email: &EmailText, purpose: Purpose, payment_delayed: bool) -> String {
        let mut reply = format!(
            "Subject: Re: {}\n\nDear [Contact Name],\n\nThank you for your email. {}\n\n",
            Self::subject(email),
            Self::purpose_sentence(purpose)
        );
        if payment_delayed {
            reply.push_str(
                "Regarding the payment delay, we are looking into it and will update you soon.\n\n",
            );
        }
        reply.push_str("Best regards,\n[Your Name]\n[Your Company]");
        reply
    }
}

/// Whether any match starts at the beginning of a word
fn starts_at_word(matcher: &AhoCorasick, text: &str) -> bool {
    matcher.find_overlapping_iter(text).any(|m| {
        text[..m.start()]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

fn strip_subject_prefix(line: &str) -> &str {
    const PREFIX: &str = "subject:";
    match line.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => &line[PREFIX.len()..],
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> AnalysisRecord {
        RuleEngine::new().classify(&EmailText::new(text))
    }

    #[test]
    fn overdue_invoice_end_to_end() {
        let record = classify("Subject: Invoice #1042 overdue. Please remit payment urgently.");
        assert_eq!(record.purpose(), "Invoice");
        assert!(record.payment_delayed());
        assert_eq!(record.risk_level(), RiskLevel::High);
        assert_eq!(
            record.suggested_action(),
            "Check payment terms and prepare for payment."
        );
        assert!(
            record
                .drafted_reply()
                .contains("Regarding the payment delay")
        );
        assert!(
            record
                .drafted_reply()
                .starts_with("Subject: Re: Invoice #1042 overdue.")
        );
    }

    #[test]
    fn empty_input_defaults() {
        let record = classify("");
        assert_eq!(record.purpose(), "General Inquiry");
        assert!(!record.payment_delayed());
        assert_eq!(record.risk_level(), RiskLevel::Low);
        assert_eq!(record.suggested_action(), "Monitor and respond appropriately.");
        assert!(record.drafted_reply().contains("Re: Your email"));
        assert!(!record.drafted_reply().contains("payment delay"));
    }

    #[test]
    fn purchase_order_beats_invoice() {
        let record = classify("New purchase order attached, invoice to follow");
        assert_eq!(record.purpose(), "Purchase Order");
        assert_eq!(
            record.suggested_action(),
            "Acknowledge receipt and confirm delivery dates."
        );
    }

    #[test]
    fn po_abbreviation_needs_trailing_space() {
        assert_eq!(classify("PO 4411 for widgets").purpose(), "Purchase Order");
        assert_eq!(classify("see the PO4411").purpose(), "General Inquiry");
    }

    #[test]
    fn po_inside_a_word_is_not_a_purchase_order() {
        assert_eq!(classify("Fixed a typo in the invoice").purpose(), "Invoice");
        assert_eq!(classify("Tempo of the audit").purpose(), "Compliance Request");
        assert_eq!(classify("repo access question").purpose(), "General Inquiry");
        assert_eq!(classify("(PO 12) attached").purpose(), "Purchase Order");
        assert_eq!(classify("typo then PO 9").purpose(), "Purchase Order");
    }

    #[test]
    fn compliance_beats_generic_payment() {
        let record = classify("Annual supplier audit: please confirm payment details");
        assert_eq!(record.purpose(), "Compliance Request");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let record = classify("INVOICE ATTACHED - URGENT");
        assert_eq!(record.purpose(), "Invoice");
        assert_eq!(record.risk_level(), RiskLevel::High);
    }

    #[test]
    fn delay_alone_is_medium_risk() {
        let record = classify("Your shipment was delayed by the carrier");
        assert!(record.payment_delayed());
        assert_eq!(record.risk_level(), RiskLevel::Medium);
        assert_eq!(
            record.suggested_action(),
            "Follow up with accounts payable to resolve delay."
        );
    }

    #[test]
    fn pending_review_is_medium_risk() {
        assert_eq!(
            classify("Your application is pending").risk_level(),
            RiskLevel::Medium
        );
        assert_eq!(
            classify("Please review the attached").risk_level(),
            RiskLevel::Medium
        );
    }

    #[test]
    fn high_keywords_override_medium_signals() {
        let record = classify("Pending review - immediate action needed");
        assert_eq!(record.risk_level(), RiskLevel::High);
    }

    #[test]
    fn subject_prefix_is_not_doubled() {
        let record = classify("subject: Quarterly audit\nDetails inside");
        assert!(
            record
                .drafted_reply()
                .starts_with("Subject: Re: Quarterly audit\n")
        );
    }

    #[test]
    fn long_first_line_is_truncated() {
        let record = classify(&"x".repeat(500));
        let first = record.drafted_reply().lines().next().unwrap();
        assert_eq!(first.len(), "Subject: Re: ".len() + MAX_SUBJECT_CHARS);
    }

    #[test]
    fn classify_is_deterministic() {
        let text = "Urgent: PO 77 delayed, pending audit";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn non_ascii_first_line_does_not_panic() {
        let record = classify("Ümlaut Grüße für Sie");
        assert_eq!(record.purpose(), "General Inquiry");
    }
}
