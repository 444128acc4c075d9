//! SupplySync HTTP presentation layer
//!
//! This crate provides the HTTP API in front of the analysis engine.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{RequestId, RequestIdLayer, ValidatedJson, ValidationError};
pub use routes::{create_app, create_router};
pub use state::AppState;
