//! Raw email text as received from the caller

use std::fmt;

use serde::{Deserialize, Serialize};

/// One email as opaque text (subject and body, or the raw message)
///
/// No structure is assumed. The text is kept exactly as given, including
/// whitespace and quoting artifacts.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EmailText(String);

impl EmailText {
    /// Wrap raw email text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the raw text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (not bytes)
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// True if the text has no visible content
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First non-blank line, trimmed
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.0.lines().map(str::trim).find(|line| !line.is_empty())
    }

    /// Consume and return the inner string
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

// Email bodies can carry personal data; keep them out of debug output.
impl fmt::Debug for EmailText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailText")
            .field("chars", &self.char_count())
            .finish()
    }
}

impl From<&str> for EmailText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EmailText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EmailText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
