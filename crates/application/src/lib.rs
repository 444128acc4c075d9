//! Application layer - Use cases and orchestration
//!
//! Contains the email analysis pipeline (rule engine, prompt builder,
//! response parser, schema validator, orchestrator), the history and report
//! services, and the ports that infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{
    AnalysisError, AnalysisStage, ApplicationError, BackendError, ParseError, ValidationError,
};
pub use ports::*;
pub use services::*;
