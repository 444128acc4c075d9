//! Prompt sent to a generative backend

use serde::{Deserialize, Serialize};

/// A prompt split into a fixed instruction and the untrusted payload
///
/// Backends that support a system role send `system` there; the others
/// use [`PromptText::combined`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptText {
    /// Fixed instruction and output contract
    pub system: String,
    /// Delimited email payload
    pub user: String,
}

impl PromptText {
    /// Create a prompt from its two parts
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Single-message form: instruction first, then the payload
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}
