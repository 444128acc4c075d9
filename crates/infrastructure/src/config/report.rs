//! Report rendering settings.

use serde::{Deserialize, Serialize};

/// Report header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Company shown below the title
    #[serde(default)]
    pub company_name: Option<String>,

    /// Report title
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "Payment Reminder".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            company_name: None,
            title: default_title(),
        }
    }
}
