//! Persisted analysis with its input and provenance

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::AnalysisRecord;
use crate::value_objects::{AnalysisId, AnalysisSource, EmailText};

/// One row of analysis history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisEntry {
    /// Unique identifier (time ordered)
    pub id: AnalysisId,
    /// The analysed email, verbatim
    pub email_content: EmailText,
    /// The analysis result
    pub record: AnalysisRecord,
    /// Which strategy produced the record
    pub source: AnalysisSource,
    /// When the analysis was stored
    pub created_at: DateTime<Utc>,
}

impl AnalysisEntry {
    /// Create a new entry stamped with the current time
    pub fn new(email_content: EmailText, record: AnalysisRecord, source: AnalysisSource) -> Self {
        Self {
            id: AnalysisId::new(),
            email_content,
            record,
            source,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::RiskLevel;

    #[test]
    fn new_entries_get_distinct_ids() {
        let record = AnalysisRecord::new("General Inquiry", false, RiskLevel::Low, "a", "b").unwrap();
        let a = AnalysisEntry::new("x".into(), record.clone(), AnalysisSource::Rules);
        let b = AnalysisEntry::new("x".into(), record, AnalysisSource::Rules);
        assert_ne!(a.id, b.id);
        assert!(b.created_at >= a.created_at);
    }
}
