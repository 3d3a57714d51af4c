use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness probe. Never touches the provider.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gemini-relay-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the provider must accept our credential.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.text_provider.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        AppError::ServiceUnavailable
    })?;
    Ok(StatusCode::OK)
}

/// Prometheus scrape endpoint.
pub async fn metrics() -> impl IntoResponse {
    service_core::observability::get_metrics()
}
