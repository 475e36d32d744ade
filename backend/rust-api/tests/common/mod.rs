#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mathpractice_api::{config::Config, create_router, services::AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn create_test_app() -> Router {
    create_test_app_with(Config::default())
}

pub fn create_test_app_with(config: Config) -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    create_router(Arc::new(AppState::new(config)))
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub async fn generate(app: &Router, operations: &[&str], count: u32) -> Vec<Value> {
    let (status, json) = post_json(
        app,
        "/generate-problems",
        serde_json::json!({ "operations": operations, "count": count }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", json);
    json.as_array().cloned().unwrap()
}

pub async fn record(app: &Router, problem: &Value, user_answer: i64, time_taken: f64) {
    let (status, json) = post_json(
        app,
        "/record-attempt",
        serde_json::json!({
            "problem": problem,
            "user_answer": user_answer,
            "time_taken": time_taken
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", json);
    assert_eq!(json["status"], "success");
}
