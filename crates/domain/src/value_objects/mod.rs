//! Value objects - Immutable objects defined by their attributes

mod analysis_id;
mod analysis_source;
mod email_text;
mod prompt_text;
mod purpose;
mod risk_level;

pub use analysis_id::AnalysisId;
pub use analysis_source::AnalysisSource;
pub use email_text::EmailText;
pub use prompt_text::PromptText;
pub use purpose::Purpose;
pub use risk_level::RiskLevel;
