//! Persistence module
//!
//! SQLite-based storage for analysis history.

pub mod analysis_store;
pub mod connection;
pub mod migrations;

pub use analysis_store::SqliteAnalysisStore;
pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
