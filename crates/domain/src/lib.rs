//! Domain layer for SupplySync
//!
//! Contains the analysis record, its value objects, and domain errors.
//! This layer performs no I/O and defines the ubiquitous language of the
//! email signal extraction engine.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
