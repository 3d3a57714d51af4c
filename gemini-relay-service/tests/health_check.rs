//! Probe endpoints and router-level behaviour.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{spawn_app, test_config};
use gemini_relay_service::services::providers::mock::MockTextProvider;
use gemini_relay_service::services::UploadStore;
use gemini_relay_service::startup::{build_router, AppState};
use service_core::middleware::REQUEST_ID_HEADER;
use std::sync::Arc;
use tower::util::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = spawn_app(MockTextProvider::new(true)).await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "gemini-relay-service");
}

#[tokio::test]
async fn readiness_follows_provider_health() {
    let ready = spawn_app(MockTextProvider::new(true)).await;
    let response = ready.client.get(ready.url("/ready")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let not_ready = spawn_app(MockTextProvider::new(false)).await;
    let response = not_ready
        .client
        .get(not_ready.url("/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn router_echoes_request_id() {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = test_config(upload_dir.path(), &[]);
    let uploads = UploadStore::new(upload_dir.path()).await.unwrap();
    let app = build_router(AppState {
        config,
        text_provider: Arc::new(MockTextProvider::new(true)),
        uploads,
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
}

#[tokio::test]
async fn get_on_generate_route_is_not_allowed() {
    let upload_dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState {
        config: test_config(upload_dir.path(), &[]),
        text_provider: Arc::new(MockTextProvider::new(true)),
        uploads: UploadStore::new(upload_dir.path()).await.unwrap(),
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/generate-text")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn metrics_endpoint_exposes_http_and_provider_metrics() {
    let app = spawn_app(MockTextProvider::new(true)).await;
    let failing = spawn_app(MockTextProvider::failing("quota exceeded")).await;

    let form = reqwest::multipart::Form::new().text("prompt", "count me");
    let response = app
        .client
        .post(app.url("/generate-text"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = failing
        .client
        .post(failing.url("/generate-text"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.client.get(app.url("/metrics")).send().await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();

    assert!(body.contains("http_requests_total"), "{}", body);
    assert!(body.contains("path=\"/generate-text\""), "{}", body);
    assert!(body.contains("genai_provider_latency_seconds"), "{}", body);
    assert!(body.contains("genai_tokens_total"), "{}", body);
    assert!(body.contains("genai_requests_total"), "{}", body);
    assert!(body.contains("genai_provider_errors_total"), "{}", body);
    assert!(body.contains("error_type=\"api_error\""), "{}", body);
}
