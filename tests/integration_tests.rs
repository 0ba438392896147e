//! Integration tests
//!
//! Drive the full router against a mocked Gemini endpoint

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use mcqgen::config::Settings;
use mcqgen::handlers::{create_router, create_router_with_generator};
use mcqgen::{AppResult, QuestionGenerator};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

/// Create test settings pointing at the mock server
fn create_test_settings(base_url: String, extra: &[(&str, &str)]) -> Settings {
    let mut env: HashMap<String, String> = HashMap::new();
    env.insert("GL_API_KEY".to_string(), "test-key".to_string());
    env.insert("GEMINI_API_BASE".to_string(), base_url);
    for (k, v) in extra {
        env.insert(k.to_string(), v.to_string());
    }
    Settings::from_source(|key| env.get(key).cloned()).expect("Failed to create test settings")
}

async fn create_test_app(server: &MockServer) -> Router {
    let settings = create_test_settings(server.url("/v1beta/models"), &[]);
    create_router(settings).await.expect("Failed to create router")
}

/// Gemini reply whose first candidate carries `text`
fn gemini_text_reply(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [ { "text": text } ] },
                "finishReason": "STOP"
            }
        ]
    })
}

/// Generator that answers with the topic it was given
#[derive(Default)]
struct EchoGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl QuestionGenerator for EchoGenerator {
    async fn generate(&self, topic: &str) -> AppResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "topic": topic, "questions": [] }))
    }
}

fn create_echo_app(extra: &[(&str, &str)]) -> (Router, Arc<EchoGenerator>) {
    let settings = create_test_settings("http://127.0.0.1:1/v1beta/models".to_string(), extra);
    let generator = Arc::new(EchoGenerator::default());
    let app = create_router_with_generator(settings, generator.clone())
        .expect("Failed to create router");
    (app, generator)
}

async fn post_generate(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_root_endpoint() {
    let server = MockServer::start_async().await;
    let app = create_test_app(&server).await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        "🧠 MD NEET-PG Question Generator Backend is running!"
    );
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let server = MockServer::start_async().await;
    let app = create_test_app(&server).await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["details"]["model"], "gemini-2.0-flash");
    assert_eq!(health["details"]["api_key_configured"], true);
    assert!(health["timestamp"].is_string());
}

#[tokio::test]
async fn test_generate_strict_json() {
    let server = MockServer::start_async().await;
    let question_set = json!({
        "topic": "Cardiology",
        "questions": [
            {
                "serial": 1,
                "question": "Which drug is first-line in stable angina?",
                "options": { "A": "Nitrates", "B": "Digoxin", "C": "Warfarin", "D": "Atropine" },
                "correct_answer": { "option": "A", "text": "Nitrates" },
                "explanation": "Nitrates relieve symptoms by venodilation."
            }
        ]
    });
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .query_param("key", "test-key")
                .body_contains("Generate 2 high-quality")
                .body_contains("for the topic: \\\"Cardiology\\\"");
            then.status(200).json_body(gemini_text_reply(&question_set.to_string()));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": question_set }));
}

#[tokio::test]
async fn test_generate_extracts_json_from_prose() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_text_reply(
                r#"Here you go: {"topic":"Cardiology","questions":[]} thanks"#,
            ));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["topic"], "Cardiology");
    assert_eq!(body["data"]["questions"], json!([]));
}

#[tokio::test]
async fn test_generate_rejects_non_json_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200)
                .json_body(gemini_text_reply("Sorry, I can't produce questions on that."));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Model response not in JSON format." }));
}

#[tokio::test]
async fn test_generate_rejects_invalid_brace_span() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_text_reply("{ topic: Cardiology, questions: [ }"));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Model response not in JSON format.");
}

#[tokio::test]
async fn test_generate_relays_upstream_error_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(400).json_body(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            }));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "API key not valid. Please pass a valid API key." }));
}

#[tokio::test]
async fn test_generate_without_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({
                "candidates": [ { "finishReason": "SAFETY" } ]
            }));
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "No content returned from model." }));
}

#[tokio::test]
async fn test_generate_with_unreadable_upstream_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let app = create_test_app(&server).await;
    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Upstream request failed: 502"));
}

#[tokio::test]
async fn test_generate_transport_failure() {
    // Nothing listens on port 1
    let settings = create_test_settings("http://127.0.0.1:1/v1beta/models".to_string(), &[]);
    let app = create_router(settings).await.unwrap();

    let (status, body) = post_generate(app, r#"{"topic":"Cardiology"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("error sending request"), "message: {}", message);
    assert!(!message.contains("test-key"));
}

#[tokio::test]
async fn test_body_above_axum_default_limit_is_accepted() {
    let (app, generator) = create_echo_app(&[("MAX_REQUEST_SIZE", "10485760")]);
    let topic = "a".repeat(3 * 1024 * 1024);
    let body = json!({ "topic": topic }).to_string();

    let (status, response) = post_generate(app, &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["topic"].as_str().unwrap().len(), topic.len());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_body_over_configured_limit_gets_json_413() {
    let body = json!({ "topic": "a".repeat(200) }).to_string();

    for declare_length in [true, false] {
        let (app, generator) = create_echo_app(&[("MAX_REQUEST_SIZE", "100")]);

        let mut request = Request::builder()
            .method("POST")
            .uri("/generate")
            .header("content-type", "application/json");
        if declare_length {
            request = request.header("content-length", body.len().to_string());
        }
        let request = request.body(Body::from(body.clone())).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let response: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(response, json!({ "error": "Payload too large" }));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_missing_or_empty_topic_makes_no_upstream_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_text_reply("{}"));
        })
        .await;

    for body in [r#"{"topic":""}"#, r#"{}"#, r#"{"topic":null}"#, "", "not json"] {
        let app = create_test_app(&server).await;
        let (status, response) = post_generate(app, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);
        assert_eq!(response, json!({ "error": "Please provide a topic name." }));
    }

    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_configured_question_count_reaches_prompt() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-pro:generateContent")
                .body_contains("Generate 5 high-quality");
            then.status(200).json_body(gemini_text_reply(r#"{"topic":"Renal","questions":[]}"#));
        })
        .await;

    let settings = create_test_settings(
        server.url("/v1beta/models"),
        &[("QUESTION_COUNT", "5"), ("MODEL", "gemini-1.5-pro")],
    );
    let app = create_router(settings).await.unwrap();
    let (status, _) = post_generate(app, r#"{"topic":"Renal"}"#).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let server = MockServer::start_async().await;
    let app = create_test_app(&server).await;

    let request = Request::builder()
        .uri("/")
        .header("origin", "https://anywhere.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_cors_restricted_to_app_url_in_production() {
    let server = MockServer::start_async().await;
    let settings = create_test_settings(
        server.url("/v1beta/models"),
        &[("NODE_ENV", "production"), ("APP_URL", "https://quiz.example.com")],
    );
    let app = create_router(settings).await.unwrap();

    let request = Request::builder()
        .uri("/")
        .header("origin", "https://quiz.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "https://quiz.example.com");

    let request = Request::builder()
        .uri("/")
        .header("origin", "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
