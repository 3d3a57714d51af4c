//! Request body extraction for the generation routes.

use crate::dtos::PromptBody;
use crate::models::MediaKind;
use crate::services::uploads::multipart_error;
use crate::services::{StagedFile, UploadStore};
use async_trait::async_trait;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header::CONTENT_TYPE, StatusCode};
use axum::Json;
use service_core::error::AppError;

const PROMPT_FIELD: &str = "prompt";

/// Prompt submitted to `/generate-text`, as multipart form data or JSON.
///
/// Any other body is treated as "no prompt".
#[derive(Debug, Default)]
pub struct PromptForm {
    pub prompt: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for PromptForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(multipart_rejection)?;
            read_prompt_form(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<PromptBody>::from_request(req, state)
                .await
                .map_err(json_rejection)?;
            Ok(Self {
                prompt: body.prompt,
            })
        } else {
            Ok(Self::default())
        }
    }
}

/// Text-only form: a file part is rejected.
async fn read_prompt_form(mut multipart: Multipart) -> Result<PromptForm, AppError> {
    let mut form = PromptForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unexpected file field '{}'",
                name
            )));
        }
        if name == PROMPT_FIELD {
            form.prompt = Some(field.text().await.map_err(multipart_error)?);
        }
    }

    Ok(form)
}

/// Parsed upload: optional prompt plus at most one staged file.
#[derive(Debug)]
pub struct UploadForm {
    pub prompt: Option<String>,
    pub file: Option<StagedFile>,
}

/// Walk the multipart body, staging the file found under `kind`'s field name.
///
/// Only a file part counts; a plain text value under the file field name is
/// skipped like any other field. A second file in the expected field is
/// rejected and the first one is removed when the error drops it.
pub async fn read_upload_form(
    mut multipart: Multipart,
    kind: MediaKind,
    store: &UploadStore,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm {
        prompt: None,
        file: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == kind.field_name() && field.file_name().is_some() {
            if form.file.is_some() {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Only one file is accepted in field '{}'",
                    name
                )));
            }
            form.file = Some(store.stage_field(field).await?);
        } else if name == PROMPT_FIELD && field.file_name().is_none() {
            form.prompt = Some(field.text().await.map_err(multipart_error)?);
        } else {
            tracing::debug!(field = %name, "Ignoring unexpected form field");
        }
    }

    Ok(form)
}

pub fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    client_error(rejection.status(), rejection.body_text())
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    client_error(rejection.status(), rejection.body_text())
}

fn client_error(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(anyhow::anyhow!(message))
    }
}
