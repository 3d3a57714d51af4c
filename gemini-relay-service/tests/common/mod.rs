//! Shared setup for gemini-relay-service integration tests.

#![allow(dead_code)]

use gemini_relay_service::config::RelayConfig;
use gemini_relay_service::services::providers::mock::MockTextProvider;
use gemini_relay_service::services::providers::TextProvider;
use gemini_relay_service::startup::Application;
use service_core::config::Config;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Relay running on a random port with a mock provider.
pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockTextProvider>,
    pub client: reqwest::Client,
    upload_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Files currently staged in the upload directory.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .count()
    }
}

/// Test configuration: port 0, uploads in `upload_dir`, plus any overrides.
pub fn test_config(upload_dir: &Path, overrides: &[(&str, &str)]) -> RelayConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("GEMINI_API_KEY".into(), "test-api-key".into());
    vars.insert("UPLOAD_DIR".into(), upload_dir.display().to_string());
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    RelayConfig::from_lookup(Config { port: 0 }, |key| vars.get(key).cloned())
        .expect("Failed to build test configuration")
}

pub async fn spawn_app(provider: MockTextProvider) -> TestApp {
    spawn_app_with(provider, &[]).await
}

pub async fn spawn_app_with(provider: MockTextProvider, overrides: &[(&str, &str)]) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let config = test_config(upload_dir.path(), overrides);

    let provider = Arc::new(provider);
    let app = Application::build_with_provider(config, provider.clone() as Arc<dyn TextProvider>)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(app.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        provider,
        client: reqwest::Client::new(),
        upload_dir,
    }
}
