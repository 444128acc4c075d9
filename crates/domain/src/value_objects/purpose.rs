//! Conventional email purposes

use std::fmt;

/// Conventional purposes produced by the rule engine
///
/// The purpose stored on a record is free text; generative backends may
/// return other labels. This enum only names the ones the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    PurchaseOrder,
    ComplianceRequest,
    Invoice,
    GeneralInquiry,
}

impl Purpose {
    /// Human-readable label as stored on the record
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PurchaseOrder => "Purchase Order",
            Self::ComplianceRequest => "Compliance Request",
            Self::Invoice => "Invoice",
            Self::GeneralInquiry => "General Inquiry",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(Purpose::PurchaseOrder.label(), "Purchase Order");
        assert_eq!(Purpose::Invoice.to_string(), "Invoice");
        assert_eq!(Purpose::GeneralInquiry.label(), "General Inquiry");
    }
}
