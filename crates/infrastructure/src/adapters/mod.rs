//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod generative_backend_adapter;

pub use generative_backend_adapter::GenerativeBackendAdapter;
