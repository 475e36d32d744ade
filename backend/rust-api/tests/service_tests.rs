mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

#[tokio::test]
async fn test_root_reports_running() {
    let app = common::create_test_app();

    let (status, json) = common::get_json(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Math Practice API is running!");
}

#[tokio::test]
async fn test_health_check() {
    let app = common::create_test_app();

    let (status, json) = common::get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "mathpractice-api");
    assert_eq!(json["attempts_recorded"], 0);
}

#[tokio::test]
async fn test_metrics_exposes_practice_counters() {
    let app = common::create_test_app();
    common::generate(&app, &["addition"], 2).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("problems_generated_total"));
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn test_trace_id_is_echoed() {
    let app = common::create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-trace-id", "trace-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-trace-id"], "trace-123");

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let minted = response.headers()["x-trace-id"].to_str().unwrap();
    assert_eq!(minted.len(), 36);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/generate-problems")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
