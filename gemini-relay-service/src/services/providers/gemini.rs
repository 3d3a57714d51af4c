//! Gemini AI provider implementation.
//!
//! Implements single-shot text generation over the Gemini REST API
//! (`models/{model}:generateContent`). No streaming, no retries.

use super::{FinishReason, Part, ProviderError, ProviderResponse, TextProvider};
use crate::services::payload::GenerativePart;
use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header carrying the API key. Keeps the key out of URLs and error messages.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Finish reasons after which the candidate text must not be returned.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "LANGUAGE",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Option<Duration>,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the configured model and the given method.
    fn api_url(&self, method: &str) -> String {
        let model = &self.config.model;
        if model.starts_with("models/") {
            format!("{}/{}:{}", self.config.api_base, model, method)
        } else {
            format!("{}/models/{}:{}", self.config.api_base, model, method)
        }
    }

    fn to_content_parts(parts: &[Part]) -> Vec<ContentPart> {
        parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => ContentPart::Text { text: text.clone() },
                Part::InlineData(data) => ContentPart::InlineData {
                    inline_data: data.clone(),
                },
            })
            .collect()
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, parts: &[Part]) -> Result<ProviderResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: Self::to_content_parts(parts),
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            part_count = parts.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        let response = check_status(response).await?;

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let usage = api_response.usage_metadata.clone().unwrap_or_default();
        let (text, finish_reason) = api_response.into_text()?;

        tracing::debug!(
            model = %self.config.model,
            input_tokens = usage.prompt_token_count.unwrap_or(0),
            output_tokens = usage.candidates_token_count.unwrap_or(0),
            ?finish_reason,
            "Gemini API responded"
        );

        Ok(ProviderResponse {
            text,
            input_tokens: usage.prompt_token_count.unwrap_or(0),
            output_tokens: usage.candidates_token_count.unwrap_or(0),
            finish_reason,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        // Listing models is the cheapest call that proves the key works.
        let response = self
            .client
            .get(format!("{}/models", self.config.api_base))
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        check_status(response).await.map(|_| ())
    }
}

/// Turn non-2xx responses into provider errors, preferring the API's own message.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);

    if status.as_u16() == 429 {
        return Err(ProviderError::RateLimited(message));
    }

    Err(ProviderError::ApiError(format!(
        "Gemini returned {}: {}",
        status, message
    )))
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GenerativePart,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all text parts joined.
    fn into_text(self) -> Result<(String, FinishReason), ProviderError> {
        if let Some(candidate) = self.candidates.into_iter().next() {
            let reason = candidate.finish_reason.as_deref();
            if let Some(reason) = reason.filter(|r| BLOCKING_FINISH_REASONS.contains(r)) {
                return Err(ProviderError::ContentFiltered(reason.to_string()));
            }

            let finish_reason = match reason {
                None | Some("STOP") => FinishReason::Complete,
                Some("MAX_TOKENS") => FinishReason::Length,
                Some(_) => FinishReason::Other,
            };

            let text = candidate
                .content
                .map(|c| {
                    c.parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();

            return Ok((text, finish_reason));
        }

        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::Blocked(reason));
        }

        Ok((String::new(), FinishReason::Complete))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

/// Non-text parts (function calls, code results) are ignored.
#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
