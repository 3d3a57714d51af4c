use crate::dtos::GenerateResponse;
use crate::handlers::forms::{multipart_rejection, read_upload_form, PromptForm};
use crate::models::{prompt_or_default, MediaKind, DEFAULT_TEXT_PROMPT};
use crate::services::metrics;
use crate::services::providers::Part;
use crate::services::{GenerativePart, StagedFile};
use crate::startup::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use service_core::error::AppError;
use std::time::Instant;

pub async fn generate_text(
    State(state): State<AppState>,
    form: PromptForm,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = prompt_or_default(form.prompt, DEFAULT_TEXT_PROMPT);
    let output = run_generation(&state, &[Part::Text(prompt)], "generate-text").await?;
    Ok(Json(GenerateResponse { output }))
}

pub async fn generate_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    generate_from_upload(&state, multipart, MediaKind::Image).await
}

pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    generate_from_upload(&state, multipart, MediaKind::Document).await
}

pub async fn generate_from_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    generate_from_upload(&state, multipart, MediaKind::Audio).await
}

/// Stage, encode, dispatch, then always discard the staged file.
async fn generate_from_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    kind: MediaKind,
) -> Result<Json<GenerateResponse>, AppError> {
    let multipart = multipart.map_err(multipart_rejection)?;
    let form = read_upload_form(multipart, kind, &state.uploads).await?;

    let file = form.file.ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "Missing file field '{}'",
            kind.field_name()
        ))
    })?;
    let prompt = prompt_or_default(form.prompt, kind.default_prompt());

    let result = generate_with_file(state, prompt, &file, kind).await;
    file.discard().await;

    Ok(Json(GenerateResponse { output: result? }))
}

async fn generate_with_file(
    state: &AppState,
    prompt: String,
    file: &StagedFile,
    kind: MediaKind,
) -> Result<String, AppError> {
    let part = GenerativePart::from_file(file.path(), kind).await?;
    let route = match kind {
        MediaKind::Image => "generate-from-image",
        MediaKind::Document => "generate-from-document",
        MediaKind::Audio => "generate-from-audio",
    };
    run_generation(state, &[Part::Text(prompt), Part::from(part)], route).await
}

async fn run_generation(
    state: &AppState,
    parts: &[Part],
    route: &'static str,
) -> Result<String, AppError> {
    let provider = state.text_provider.name();
    let model = state.text_provider.model();

    let start = Instant::now();
    let result = state.text_provider.generate(parts).await;
    metrics::record_provider_latency(provider, model, start.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            metrics::record_tokens(model, response.input_tokens, response.output_tokens);
            metrics::record_generation(route, model, response.finish_reason.as_str());
            tracing::info!(
                route,
                provider,
                model,
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                finish_reason = response.finish_reason.as_str(),
                output_len = response.text.len(),
                "Generation completed"
            );
            Ok(response.text)
        }
        Err(e) => {
            metrics::record_provider_error(provider, e.error_type());
            tracing::error!(route, provider, model, error = %e, "Error generating text");
            Err(e.into())
        }
    }
}
