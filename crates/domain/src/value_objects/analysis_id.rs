//! Analysis identifier for stored analysis records

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique, time-ordered analysis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    /// Create a new time-ordered analysis ID
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an analysis ID from a string
    ///
    /// # Errors
    /// Returns an error if the string is not a valid UUID
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AnalysisId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
