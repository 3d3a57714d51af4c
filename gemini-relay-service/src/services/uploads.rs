//! Staging area for uploaded files.
//!
//! Every accepted file lives in the uploads directory only for the duration of
//! the request that brought it. Removal is best-effort: failures are logged and
//! never reach the caller.

use axum::extract::multipart::Field;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Directory that receives staged uploads.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory when it does not exist yet.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stream a multipart field to a fresh, uniquely named file.
    ///
    /// A partially written file is removed if the body fails mid-stream.
    pub async fn stage_field(&self, mut field: Field<'_>) -> Result<StagedFile, AppError> {
        let staged = StagedFile::new(self.dir.join(Uuid::new_v4().simple().to_string()));
        let mut file = fs::File::create(staged.path()).await?;
        let mut size = 0usize;

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!(path = %staged.path().display(), size, "Upload staged");

        Ok(staged)
    }

    /// Write an in-memory payload to a fresh, uniquely named file.
    #[cfg(test)]
    pub async fn stage_bytes(&self, data: &[u8]) -> Result<StagedFile, AppError> {
        let staged = StagedFile::new(self.dir.join(Uuid::new_v4().simple().to_string()));
        fs::write(staged.path(), data).await?;
        Ok(staged)
    }
}

/// Map a multipart read failure to the matching client error.
pub fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart body: {}", err.body_text()))
    }
}

/// A file owned by exactly one in-flight request.
///
/// Call [`StagedFile::discard`] once the response is prepared. If the value is
/// dropped first (early error, client disconnect) the file is removed
/// synchronously in `Drop`.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    removed: bool,
}

impl StagedFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. Errors are logged, never returned.
    pub async fn discard(mut self) {
        self.removed = true;
        if let Err(e) = fs::remove_file(&self.path).await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Error deleting staged upload"
            );
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Error deleting abandoned upload"
                );
            }
        }
    }
}
