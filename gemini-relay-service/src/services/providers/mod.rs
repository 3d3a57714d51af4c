//! AI provider abstractions and implementations.
//!
//! Handlers only see [`TextProvider`], so the Gemini backend can be swapped for
//! the mock in tests.

pub mod gemini;
pub mod mock;

use crate::services::payload::GenerativePart;
use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Response was blocked: {0}")]
    Blocked(String),

    #[error("Content filtered: candidate stopped with {0}")]
    ContentFiltered(String),

    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Stable label for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::Blocked(_) => "blocked",
            ProviderError::ContentFiltered(_) => "content_filtered",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::GenerationError(err.to_string())
    }
}

/// One element of the ordered content sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData(GenerativePart),
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::Text(text.to_string())
    }
}

impl From<GenerativePart> for Part {
    fn from(part: GenerativePart) -> Self {
        Part::InlineData(part)
    }
}

/// Result of a provider response.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    Other,
}

impl FinishReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::Other => "other",
        }
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Model every request is sent to.
    fn model(&self) -> &str;

    /// Send the parts as a single user turn and wait for the whole answer.
    async fn generate(&self, parts: &[Part]) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
