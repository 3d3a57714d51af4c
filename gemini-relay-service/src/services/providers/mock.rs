//! Mock provider implementation for testing.

use super::{FinishReason, Part, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// How the mock answers.
#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Reply(String),
    Fail(String),
    Disabled,
}

/// Mock text provider for testing. Records every call it receives.
pub struct MockTextProvider {
    behavior: Behavior,
    calls: Mutex<Vec<Vec<Part>>>,
}

impl MockTextProvider {
    /// Enabled mocks answer `Mock response for: <first text part>`.
    pub fn new(enabled: bool) -> Self {
        let behavior = if enabled {
            Behavior::Echo
        } else {
            Behavior::Disabled
        };
        Self::with_behavior(behavior)
    }

    /// Always answer with the given text.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(text.into()))
    }

    /// Always fail as an upstream API error with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Parts of every `generate` call so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<Part>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, parts: &[Part]) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(parts.to_vec());
        }

        let prompt = parts
            .iter()
            .find_map(|p| match p {
                Part::Text(text) => Some(text.as_str()),
                Part::InlineData(_) => None,
            })
            .unwrap_or_default();

        let text = match &self.behavior {
            Behavior::Echo => format!("Mock response for: {}", prompt),
            Behavior::Reply(text) => text.clone(),
            Behavior::Fail(message) => return Err(ProviderError::ApiError(message.clone())),
            Behavior::Disabled => {
                return Err(ProviderError::NotConfigured(
                    "Mock text provider not enabled".to_string(),
                ))
            }
        };

        Ok(ProviderResponse {
            text,
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: 10,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.behavior {
            Behavior::Disabled => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
