//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod analysis_store;
mod generative_port;
mod report_renderer;

pub use analysis_store::AnalysisStorePort;
#[cfg(test)]
pub use analysis_store::MockAnalysisStorePort;
pub use generative_port::{GeneratedText, GenerativePort};
#[cfg(test)]
pub use generative_port::MockGenerativePort;
pub use report_renderer::{Report, ReportFormat, ReportOptions, ReportRendererPort};
#[cfg(test)]
pub use report_renderer::MockReportRendererPort;
