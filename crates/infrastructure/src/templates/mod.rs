//! Report rendering with Tera
//!
//! Renders an analysis record into a fixed report layout: title, date,
//! analysis summary and the drafted reply. Templates are embedded at
//! compile time; `report.html` is auto-escaped, `report.txt` is not.

use std::collections::HashMap;

use application::{
    error::ApplicationError,
    ports::{Report, ReportFormat, ReportOptions, ReportRendererPort},
};
use domain::AnalysisRecord;
use serde::Serialize;
use tera::{Context, Tera, Value};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ReportConfig;

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(String),

    /// Template compilation failed
    #[error("Template compilation failed: {0}")]
    Compile(String),

    /// Invalid template context
    #[error("Invalid context: {0}")]
    Context(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(e.to_string()),
        }
    }
}

impl From<TemplateError> for ApplicationError {
    fn from(e: TemplateError) -> Self {
        Self::Rendering(e.to_string())
    }
}

/// Embedded templates - compiled into the binary
mod embedded {
    pub const REPORT_TEXT: &str = r"{{ title }}
{% if company_name %}{{ company_name }}
{% endif %}
Date: {{ date }}

Analysis Summary
Purpose: {{ purpose }}
Payment Delayed: {% if payment_delayed %}Yes{% else %}No{% endif %}
Risk Level: {{ risk_level }}
Suggested Action: {{ suggested_action }}

Drafted Reply
{{ drafted_reply }}
";

    pub const REPORT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{{ title }}</title>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.5; margin: 50px; }
        h1 { font-size: 20px; text-align: center; }
        h2 { font-size: 14px; margin-bottom: 5px; }
        section { margin-bottom: 15px; font-size: 11pt; }
    </style>
</head>
<body>
    <h1>{{ title }}</h1>
{% if company_name %}    <p class="company">{{ company_name }}</p>
{% endif %}    <section>
        <h2>Date:</h2>
        <p>{{ date }}</p>
    </section>
    <section>
        <h2>Analysis Summary:</h2>
        <p>Purpose: {{ purpose }}</p>
        <p>Payment Delayed: {% if payment_delayed %}Yes{% else %}No{% endif %}</p>
        <p>Risk Level: {{ risk_level }}</p>
        <p>Suggested Action: {{ suggested_action }}</p>
    </section>
    <section>
        <h2>Drafted Reply:</h2>
        <p>{{ drafted_reply | escape | linebreaksbr | safe }}</p>
    </section>
</body>
</html>
"#;
}

const TEXT_TEMPLATE: &str = "report.txt";
const HTML_TEMPLATE: &str = "report.html";

/// Values exposed to the report templates
#[derive(Debug, Serialize)]
struct ReportContext<'a> {
    title: &'a str,
    company_name: Option<&'a str>,
    date: String,
    purpose: &'a str,
    payment_delayed: bool,
    risk_level: &'static str,
    suggested_action: &'a str,
    drafted_reply: &'a str,
}

/// Report renderer backed by embedded Tera templates
#[derive(Debug, Clone)]
pub struct TeraReportRenderer {
    tera: Tera,
    config: ReportConfig,
}

impl TeraReportRenderer {
    /// Compile the embedded templates
    pub fn new(config: ReportConfig) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html", ".htm", ".xml"]);

        tera.add_raw_template(TEXT_TEMPLATE, embedded::REPORT_TEXT)
            .map_err(|e| TemplateError::Compile(e.to_string()))?;
        tera.add_raw_template(HTML_TEMPLATE, embedded::REPORT_HTML)
            .map_err(|e| TemplateError::Compile(e.to_string()))?;

        tera.register_filter("linebreaksbr", linebreaksbr_filter);

        Ok(Self { tera, config })
    }

    /// Render one record to a string
    pub fn render_record(
        &self,
        record: &AnalysisRecord,
        options: &ReportOptions,
    ) -> Result<String, TemplateError> {
        let values = ReportContext {
            title: &self.config.title,
            company_name: self.config.company_name.as_deref(),
            date: options.generated_at.format("%Y-%m-%d").to_string(),
            purpose: record.purpose(),
            payment_delayed: record.payment_delayed(),
            risk_level: record.risk_level().as_str(),
            suggested_action: record.suggested_action(),
            drafted_reply: record.drafted_reply(),
        };
        let context =
            Context::from_serialize(&values).map_err(|e| TemplateError::Context(e.to_string()))?;

        let template = match options.format {
            ReportFormat::Text => TEXT_TEMPLATE,
            ReportFormat::Html => HTML_TEMPLATE,
        };
        self.tera
            .render(template, &context)
            .map_err(TemplateError::from)
    }

    /// List all available template names
    #[must_use]
    pub fn list_templates(&self) -> Vec<&str> {
        self.tera.get_template_names().collect()
    }
}

impl ReportRendererPort for TeraReportRenderer {
    #[instrument(skip(self, record, options), fields(format = ?options.format))]
    fn render(
        &self,
        record: &AnalysisRecord,
        options: &ReportOptions,
    ) -> Result<Report, ApplicationError> {
        let body = self.render_record(record, options)?;
        debug!(body_len = body.len(), "Report rendered");

        Ok(Report {
            content_type: options.format.content_type(),
            filename: format!(
                "payment-reminder-{}.{}",
                options.generated_at.format("%Y%m%d"),
                options.format.extension()
            ),
            body,
        })
    }
}

/// Custom filter: Convert newlines to <br> tags
fn linebreaksbr_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("linebreaksbr requires a string"))?;
    Ok(Value::String(s.replace('\n', "<br>\n")))
}
