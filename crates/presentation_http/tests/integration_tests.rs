//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use application::{
    AnalysisConfig, AnalysisService, BackendError, FallbackPolicy, HistoryService, ReportService,
    ports::{GeneratedText, GenerativePort},
};
use async_trait::async_trait;
use axum::http::{StatusCode, header};
use axum_test::TestServer;
use domain::PromptText;
use infrastructure::{
    AppConfig, DatabaseConfig, ReportConfig, SqliteAnalysisStore, TeraReportRenderer, create_pool,
};
use presentation_http::{create_app, state::AppState};
use serde_json::{Value, json};

/// Backend stub answering every prompt the same way
struct StubBackend {
    reply: Result<String, BackendError>,
    healthy: bool,
}

impl StubBackend {
    fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            healthy: true,
        }
    }

    fn down() -> Self {
        Self {
            reply: Err(BackendError::Unavailable("connection refused".to_string())),
            healthy: false,
        }
    }
}

#[async_trait]
impl GenerativePort for StubBackend {
    async fn generate(&self, _prompt: &PromptText) -> Result<GeneratedText, BackendError> {
        match &self.reply {
            Ok(text) => Ok(GeneratedText {
                text: text.clone(),
                model: "stub-model".to_string(),
            }),
            Err(BackendError::Unavailable(msg)) => Err(BackendError::Unavailable(msg.clone())),
            Err(BackendError::EmptyResponse) => Err(BackendError::EmptyResponse),
        }
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }

    fn model_name(&self) -> String {
        "stub-model".to_string()
    }
}

fn server_with(backend: Option<StubBackend>, fallback: FallbackPolicy) -> TestServer {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::in_memory();
    config.analysis.fallback_to_rules = fallback == FallbackPolicy::RuleEngine;

    let backend = backend.map(|b| Arc::new(b) as Arc<dyn GenerativePort>);
    let analysis = AnalysisService::new(
        backend,
        AnalysisConfig {
            fallback,
            ..AnalysisConfig::default()
        },
    );

    let pool = create_pool(&config.database).expect("in-memory pool");
    let history = HistoryService::new(Arc::new(SqliteAnalysisStore::new(Arc::new(pool))));
    let renderer = TeraReportRenderer::new(ReportConfig::default()).expect("templates");
    let reports = ReportService::new(Arc::new(renderer));

    let state = AppState::new(
        Arc::new(analysis),
        Arc::new(history),
        Arc::new(reports),
        Arc::new(config),
    );
    TestServer::new(create_app(state)).expect("test server")
}

fn rules_server() -> TestServer {
    server_with(None, FallbackPolicy::RuleEngine)
}

const MODEL_ANSWER: &str = r#"Sure, here is the analysis:
{"purpose": "Compliance Request", "paymentDelayed": false, "riskLevel": "medium",
 "suggestedAction": "Send the ISO certificate.", "draftedReply": "Dear Ana,\nAttached."}"#;

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = rules_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = rules_server();

    let response = server.get("/health").await;

    assert!(response.maybe_header("x-request-id").is_some());
}

#[tokio::test]
async fn ready_without_backend() {
    let server = rules_server();

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["ready"], true);
    assert_eq!(json["backend"]["configured"], false);
    assert_eq!(json["database"]["healthy"], true);
}

#[tokio::test]
async fn unhealthy_backend_is_degraded_when_fallback_enabled() {
    let server = server_with(Some(StubBackend::down()), FallbackPolicy::RuleEngine);

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["ready"], true);
    assert_eq!(json["degraded"], true);
    assert_eq!(json["backend"]["model"], "stub-model");
}

#[tokio::test]
async fn unhealthy_backend_without_fallback_is_not_ready() {
    let server = server_with(Some(StubBackend::down()), FallbackPolicy::Disabled);

    let response = server.get("/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["ready"], false);
}

#[tokio::test]
async fn analyze_with_rules() {
    let server = rules_server();

    let response = server
        .post("/api/analyze")
        .json(&json!({
            "emailContent": "Subject: Invoice #1042 overdue\n\nPlease remit payment urgently.",
            "strategy": "rule_based"
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["purpose"], "Invoice");
    assert_eq!(json["paymentDelayed"], true);
    assert_eq!(json["riskLevel"], "high");
    assert_eq!(json["source"], "rules");
    assert!(
        json["draftedReply"]
            .as_str()
            .unwrap()
            .starts_with("Subject: Re: Invoice #1042 overdue")
    );
    assert!(json["id"].as_str().is_some());
}

#[tokio::test]
async fn british_spelling_route_is_served() {
    let server = rules_server();

    let response = server
        .post("/api/analyse")
        .json(&json!({"email": "Purchase order 55 attached"}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["purpose"], "Purchase Order");
}

#[tokio::test]
async fn analyze_with_model() {
    let server = server_with(
        Some(StubBackend::answering(MODEL_ANSWER)),
        FallbackPolicy::RuleEngine,
    );

    let response = server
        .post("/api/analyze")
        .json(&json!({"emailContent": "Please send your ISO 9001 certificate."}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["purpose"], "Compliance Request");
    assert_eq!(json["riskLevel"], "medium");
    assert_eq!(json["source"], "model");
    assert_eq!(json["model"], "stub-model");
}

#[tokio::test]
async fn backend_failure_falls_back_to_rules() {
    let server = server_with(Some(StubBackend::down()), FallbackPolicy::RuleEngine);

    let response = server
        .post("/api/analyze")
        .json(&json!({"emailContent": "Audit documents needed", "strategy": "generative"}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["purpose"], "Compliance Request");
    assert_eq!(json["source"], "rule_fallback");
    assert_eq!(json["fallbackReason"], "backend unavailable");
}

#[tokio::test]
async fn unparseable_answer_without_fallback_is_500() {
    let server = server_with(
        Some(StubBackend::answering("I cannot help with that.")),
        FallbackPolicy::Disabled,
    );

    let response = server
        .post("/api/analyze")
        .json(&json!({"emailContent": "Invoice attached", "strategy": "generative"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["code"], "analysis_failed");
    assert!(!json["error"].as_str().unwrap().contains("cannot help"));
}

#[tokio::test]
async fn blank_email_is_rejected() {
    let server = rules_server();

    let response = server
        .post("/api/analyze")
        .json(&json!({"emailContent": "   "}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["code"], "validation_error");
}

#[tokio::test]
async fn oversized_email_is_rejected() {
    let server = rules_server();
    let huge = "a".repeat(application::DEFAULT_MAX_EMAIL_CHARS + 1);

    let response = server
        .post("/api/analyze")
        .json(&json!({"emailContent": huge, "strategy": "rule_based"}))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn history_lists_newest_first() {
    let server = rules_server();

    for body in ["first: invoice", "second: purchase order", "third: audit"] {
        server
            .post("/api/analyze")
            .json(&json!({"emailContent": body, "strategy": "rule_based"}))
            .await
            .assert_status_ok();
    }

    let response = server.get("/api/history").await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["emailContent"], "third: audit");
    assert_eq!(items[2]["emailContent"], "first: invoice");

    let limited = server
        .get("/api/history")
        .add_query_param("limit", 1)
        .await;
    let items: Vec<Value> = limited.json();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn history_entry_lookup() {
    let server = rules_server();

    let created: Value = server
        .post("/api/analyze")
        .json(&json!({"emailContent": "Invoice 7 attached", "strategy": "rule_based"}))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server.get(&format!("/api/history/{id}")).await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["id"], id);
    assert_eq!(json["emailContent"], "Invoice 7 attached");
    assert_eq!(json["purpose"], "Invoice");
}

#[tokio::test]
async fn history_entry_errors() {
    let server = rules_server();

    server
        .get("/api/history/not-a-uuid")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/api/history/0190a5b2-7c3e-7000-8000-000000000000")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

fn analysis_data() -> Value {
    json!({
        "purpose": "Invoice",
        "paymentDelayed": true,
        "riskLevel": "high",
        "suggestedAction": "Check payment terms and prepare for payment.",
        "draftedReply": "Dear [Contact Name],\n\nWe are on it."
    })
}

#[tokio::test]
async fn report_as_text_download() {
    let server = rules_server();

    let response = server
        .post("/api/report")
        .json(&json!({"analysisData": analysis_data()}))
        .await;

    response.assert_status_ok();
    let content_type = response.header(header::CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    let disposition = response.header(header::CONTENT_DISPOSITION);
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"payment-reminder-"));
    assert!(disposition.ends_with(".txt\""));

    let body = response.text();
    assert!(body.contains("Purpose: Invoice"));
    assert!(body.contains("Payment Delayed: Yes"));
}

#[tokio::test]
async fn report_as_html_escapes_reply() {
    let server = rules_server();
    let mut data = analysis_data();
    data["draftedReply"] = json!("<b>Hi</b>\nthanks");

    let response = server
        .post("/api/report")
        .json(&json!({"analysisData": data, "format": "html"}))
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("&lt;b&gt;Hi&lt;&#x2F;b&gt;") || body.contains("&lt;b&gt;Hi&lt;/b&gt;"));
    assert!(!body.contains("<b>Hi</b>"));
}

#[tokio::test]
async fn report_rejects_invalid_record() {
    let server = rules_server();
    let mut data = analysis_data();
    data["riskLevel"] = json!("critical");

    let response = server
        .post("/api/report")
        .json(&json!({"analysisData": data}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("riskLevel"));
}
