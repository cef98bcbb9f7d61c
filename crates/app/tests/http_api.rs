//! Router tests against in-memory storage and a scripted text recognizer.

use std::sync::Arc;

use app::{AppState, build_router};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use services::{AnalyzeError, AppServices, TextRecognizer};
use storage::repository::{KeyValueStore, Storage};
use tower::util::ServiceExt; // for `oneshot`
use tracker_core::time::fixed_clock;

enum Script {
    Text(&'static str),
    UpstreamError(&'static str),
    Unreachable,
}

#[async_trait]
impl TextRecognizer for Script {
    async fn recognize(&self, _image_base64: &str) -> Result<String, AnalyzeError> {
        match self {
            Script::Text(text) => Ok((*text).to_string()),
            Script::UpstreamError(message) => Err(AnalyzeError::Upstream {
                message: (*message).to_string(),
            }),
            Script::Unreachable => Err(AnalyzeError::Disabled),
        }
    }
}

fn setup_app(storage: &Storage, script: Script) -> axum::Router {
    let services = AppServices::from_parts(storage, fixed_clock(), Arc::new(script));
    build_router(AppState::new(services))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// /analyze
// =============================================================================

#[tokio::test]
async fn analyze_returns_raw_text_and_extracted_fields() {
    let app = setup_app(&Storage::in_memory(), Script::Text("Level B, Book 12"));

    let response = app
        .oneshot(json_request("POST", "/analyze", json!({"imageBase64": "aW1n"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({"rawText": "Level B, Book 12", "extracted": {"level": "B", "book": "12"}})
    );
}

#[tokio::test]
async fn analyze_without_image_is_bad_request() {
    for body in [json!({}), json!({"imageBase64": ""}), json!({"image": "aW1n"})] {
        let app = setup_app(&Storage::in_memory(), Script::Text("unused"));
        let response = app
            .oneshot(json_request("POST", "/analyze", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body, json!({"error": "No image provided"}));
    }
}

#[tokio::test]
async fn analyze_with_non_json_body_is_bad_request() {
    let app = setup_app(&Storage::in_memory(), Script::Text("unused"));
    let response = app.oneshot(empty_request("POST", "/analyze")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_upstream_error_is_server_error_with_message() {
    let app = setup_app(&Storage::in_memory(), Script::UpstreamError("E500: busy"));
    let response = app
        .oneshot(json_request("POST", "/analyze", json!({"imageBase64": "aW1n"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "E500: busy"}));
}

#[tokio::test]
async fn analyze_transport_failure_is_generic_server_error() {
    let app = setup_app(&Storage::in_memory(), Script::Unreachable);
    let response = app
        .oneshot(json_request("POST", "/analyze", json!({"imageBase64": "aW1n"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Server Error"}));
}

// =============================================================================
// Students and entries
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = setup_app(&Storage::in_memory(), Script::Text(""));
    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn students_start_with_default_and_accept_new_names() {
    let storage = Storage::in_memory();

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(empty_request("GET", "/students"))
        .await
        .unwrap();
    assert_eq!(extract_json(response.into_body()).await, json!(["Default"]));

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(json_request("POST", "/students", json!({"name": " Lea "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(extract_json(response.into_body()).await, json!(["Default", "Lea"]));

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(json_request("POST", "/students", json!({"name": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn entry_lifecycle_over_http() {
    let storage = Storage::in_memory();

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(json_request(
            "POST",
            "/students/Lea/btm/entries",
            json!({"level": "c", "book": "4", "errors": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = extract_json(response.into_body()).await;
    assert_eq!(created["label"], "LC-B4");
    assert_eq!(created["category"], "BTM");
    assert_eq!(created["date"], "11/14/2023");
    let id = created["id"].as_str().unwrap().to_string();

    setup_app(&storage, Script::Text(""))
        .oneshot(json_request(
            "POST",
            "/students/Lea/BTM/entries",
            json!({"level": "C", "book": "5", "errors": 0, "date": "2/1/2024"}),
        ))
        .await
        .unwrap();

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(empty_request("GET", "/students/Lea/BTM/entries"))
        .await
        .unwrap();
    let listed = extract_json(response.into_body()).await;
    let labels: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["LC-B4", "LC-B5"]);

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(empty_request("GET", "/students/Lea/dashboard"))
        .await
        .unwrap();
    let dashboard = extract_json(response.into_body()).await;
    assert_eq!(dashboard[0]["title"], "Basic Thinking Math");
    assert_eq!(dashboard[0]["series"]["points"][1]["y"], 0);
    assert_eq!(dashboard[0]["history"][0]["label"], "LC-B5");
    assert!(dashboard[1]["series"].is_null());

    let uri = format!("/students/Lea/BTM/entries/{id}");
    for _ in 0..2 {
        let response = setup_app(&storage, Script::Text(""))
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(empty_request("GET", "/students/Lea/BTM/entries"))
        .await
        .unwrap();
    let listed = extract_json(response.into_body()).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_input_is_bad_request() {
    let storage = Storage::in_memory();

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(empty_request("GET", "/students/Lea/history/entries"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(json_request(
            "POST",
            "/students/Lea/CTM/entries",
            json!({"level": "A", "book": "1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "error count is required"}));
}

#[tokio::test]
async fn corrupt_partition_is_reported_without_details() {
    let storage = Storage::in_memory();
    storage.kv.set("data_Lea_English", "{broken").await.unwrap();

    let response = setup_app(&storage, Script::Text(""))
        .oneshot(empty_request("GET", "/students/Lea/english/entries"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Stored data is corrupted"}));
}

#[tokio::test]
async fn malformed_body_gets_short_message() {
    let storage = Storage::in_memory();

    for (uri, body) in [
        ("/students", json!({"name": 5})),
        ("/students/Lea/BTM/entries", json!({"level": "A", "book": "1", "errors": "two"})),
    ] {
        let response = setup_app(&storage, Script::Text(""))
            .oneshot(json_request("POST", uri, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body, json!({"error": "Invalid request body"}));
    }
}

#[tokio::test]
async fn blank_entry_id_is_bad_request() {
    let storage = Storage::in_memory();
    let response = setup_app(&storage, Script::Text(""))
        .oneshot(empty_request("DELETE", "/students/Lea/BTM/entries/%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({"error": "Invalid entry id"}));
}
