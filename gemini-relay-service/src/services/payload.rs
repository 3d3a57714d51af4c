//! Turns staged uploads into inline model parts.

use crate::models::MediaKind;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use service_core::error::AppError;
use std::path::Path;

/// MIME-tagged, base64-encoded payload sent inline with a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerativePart {
    pub mime_type: String,
    pub data: String,
}

impl GenerativePart {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Read a staged file and tag it with the route's fixed MIME type.
    pub async fn from_file(path: &Path, kind: MediaKind) -> Result<Self, AppError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read staged upload");
            AppError::from(e)
        })?;
        Ok(Self::from_bytes(kind.mime_type(), &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_bytes_decode_back() {
        let bytes: Vec<u8> = (0..=255).collect();
        let part = GenerativePart::from_bytes("image/png", &bytes);

        assert_eq!(part.mime_type, "image/png");
        assert_eq!(STANDARD.decode(&part.data).unwrap(), bytes);
    }

    #[test]
    fn uses_padded_standard_alphabet() {
        let part = GenerativePart::from_bytes("audio/mpeg", &[0xfb, 0xff]);
        assert_eq!(part.data, "+/8=");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let part = GenerativePart::from_bytes("application/pdf", b"%PDF");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["mimeType"], "application/pdf");
        assert_eq!(json["data"], "JVBERg==");
    }

    #[tokio::test]
    async fn reads_file_with_route_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload");
        std::fs::write(&path, b"not really a pdf").unwrap();

        let part = GenerativePart::from_file(&path, MediaKind::Document)
            .await
            .unwrap();

        assert_eq!(part.mime_type, "application/pdf");
        assert_eq!(STANDARD.decode(&part.data).unwrap(), b"not really a pdf");
    }

    #[tokio::test]
    async fn missing_file_is_an_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GenerativePart::from_file(&dir.path().join("gone"), MediaKind::Image)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
