//! Domain entities - Objects with identity and lifecycle

mod analysis_entry;
mod analysis_record;

pub use analysis_entry::AnalysisEntry;
pub use analysis_record::AnalysisRecord;
