use gemini_relay_service::config::RelayConfig;
use gemini_relay_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(
        "gemini-relay-service",
        &log_level,
        otlp_endpoint.as_deref().filter(|e| !e.trim().is_empty()),
    );

    let config = RelayConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!(
        "Gemini relay server is running at http://localhost:{}",
        app.port()
    );

    app.run_until_stopped().await
}
