//! Integration tests for the HTTP API
//!
//! Readings, plans, the sign catalog and error mapping, with a scripted
//! text generator and an in-memory store

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use orakl::core::{
    create_router, AppState, GenerationRequest, MemoryReadingStore, Oracle, TextGenerator,
};
use orakl::OraklError;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Always answers with the same text
struct ScriptedGenerator(String);

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, OraklError> {
        Ok(self.0.clone())
    }
}

/// Upstream is down
struct DownGenerator;

#[async_trait]
impl TextGenerator for DownGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, OraklError> {
        Err(OraklError::Generation("connection refused".to_string()))
    }
}

fn router_with(generator: Arc<dyn TextGenerator>) -> Router {
    let store = Arc::new(MemoryReadingStore::new());
    create_router(Arc::new(AppState::new(Oracle::new(), generator, Some(store))))
}

fn create_test_router() -> Router {
    router_with(Arc::new(ScriptedGenerator(
        r#"Here is your reading: {"reading": "The butterfly carries your answer.", "verdict": "The path is opening"}"#
            .to_string(),
    )))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], orakl::VERSION);
    assert!(json["signs_known"].as_u64().unwrap() > 50);
}

#[tokio::test]
async fn test_signs_catalog_tiers() {
    let app = create_test_router();

    let (status, quick) = send(&app, "GET", "/signs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quick["tier"], "quick");
    assert_eq!(quick["categories"].as_array().unwrap().len(), 9);

    let (_, deep) = send(&app, "GET", "/signs?tier=deep", None).await;
    assert_eq!(deep["categories"].as_array().unwrap().len(), 17);

    let (status, _) = send(&app, "GET", "/signs?tier=premium", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reading_success() {
    let app = create_test_router();
    let (status, json) = send(
        &app,
        "POST",
        "/reading",
        Some(json!({
            "question": "Should I take the new job?",
            "signs": ["Butterfly appeared", "Rainbow appeared", "Ladybug landed on me"],
            "pathType": "quick"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reading"], "The butterfly carries your answer.");
    assert_eq!(json["verdict"], "YES — The path is opening");
    assert!(json["id"].is_string());

    let analysis = &json["analysis"];
    assert_eq!(analysis["type"], "should_i");
    assert_eq!(analysis["domain"], "career");
    assert_eq!(analysis["finalLean"], "yes");
    assert_eq!(analysis["sufficient"], true);
    assert_eq!(analysis["template"], "quick");
    assert_eq!(analysis["combinationCount"], 0);
}

#[tokio::test]
async fn test_reading_is_stored() {
    let app = create_test_router();
    let (_, json) = send(
        &app,
        "POST",
        "/reading",
        Some(json!({
            "question": "Will I find love this year?",
            "signs": ["Repeated numbers (111, 222, 333...)", "Butterfly appeared"]
        })),
    )
    .await;
    let id = json["id"].as_str().unwrap().to_string();

    let (status, record) = send(&app, "GET", &format!("/reading/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["question"], "Will I find love this year?");
    assert_eq!(record["combination_count"], 1);
    assert_eq!(record["input_digest"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_unknown_reading_404() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/reading/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_generator_failure_is_502() {
    let app = router_with(Arc::new(DownGenerator));
    let (status, json) = send(
        &app,
        "POST",
        "/reading",
        Some(json!({"question": "Will it rain?", "signs": ["Déjà vu", "Sudden silence"]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json, json!({"error": "Failed to generate reading"}));
}

#[tokio::test]
async fn test_invalid_input_is_400() {
    let app = create_test_router();

    let (status, _) = send(&app, "POST", "/reading", Some(json!({"question": "  ", "signs": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/reading", Some(json!({"question": "Will it work?"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/reading", Some(json!({"question": 42, "signs": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_signs_take_insufficient_path() {
    let app = router_with(Arc::new(ScriptedGenerator(
        r#"{"reading": "Keep watching.", "verdict": "YES — absolutely"}"#.to_string(),
    )));
    let (status, json) = send(
        &app,
        "POST",
        "/reading",
        Some(json!({"question": "Will it work?", "signs": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["verdict"], "The universe needs more signs");
    assert_eq!(json["analysis"]["template"], "insufficient");
    assert_eq!(json["analysis"]["sufficient"], false);
}

#[tokio::test]
async fn test_lone_combination_sign_reads_as_insufficient() {
    let store = Arc::new(MemoryReadingStore::new());
    let app = create_router(Arc::new(AppState::new(
        Oracle::new(),
        Arc::new(ScriptedGenerator(
            r#"{"reading": "The night woke you for a reason.", "verdict": "WAIT — listen closely"}"#.to_string(),
        )),
        Some(store),
    )));
    let (status, json) = send(
        &app,
        "POST",
        "/reading",
        Some(json!({"question": "Should I take the job?", "signs": ["Woke up at 3am or 4am"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["verdict"], "The universe needs more signs");
    assert_eq!(json["analysis"]["finalLean"], "insufficient");
    assert_eq!(json["analysis"]["finalConfidence"], 0.0);
    assert_eq!(json["analysis"]["combinationCount"], 1);

    let id = json["id"].as_str().unwrap();
    let (_, record) = send(&app, "GET", &format!("/reading/{}", id), None).await;
    assert_eq!(record["final_lean"], "insufficient");
}

#[tokio::test]
async fn test_malformed_output_falls_back() {
    let app = router_with(Arc::new(ScriptedGenerator(
        "The signs swirl but refuse to settle.".to_string(),
    )));
    let (status, json) = send(
        &app,
        "POST",
        "/reading",
        Some(json!({
            "question": "Should I leave?",
            "signs": ["Nightmare that felt like a warning", "Stomach dropped (intuition warning)"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reading"], "The signs swirl but refuse to settle.");
    assert_eq!(json["verdict"], "NO — The universe urges caution");
}

#[tokio::test]
async fn test_analyze_returns_plan() {
    let app = router_with(Arc::new(DownGenerator));
    let (status, plan) = send(
        &app,
        "POST",
        "/analyze",
        Some(json!({
            "question": "Is this relationship right for me?",
            "signs": ["Butterfly appeared", "Déjà vu", "Rainbow appeared", "Strong gut feeling"],
            "isDeepReading": true,
            "dayCount": 5
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["template"], "deep");
    assert_eq!(plan["maxOutputTokens"], 2048);
    assert_eq!(plan["signCheck"]["sufficient"], true);
    assert_eq!(plan["analysis"]["domain"], "relationship");
    assert!(plan["prompt"].as_str().unwrap().contains("5-day Deep Reading"));
}
