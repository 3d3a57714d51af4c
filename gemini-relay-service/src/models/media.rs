/// Upload routes and the fixed contract each one assumes.
///
/// The declared MIME type is trusted; uploaded bytes are never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Document,
    Audio,
}

impl MediaKind {
    /// Multipart field carrying the file.
    pub fn field_name(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            MediaKind::Image => "image/png",
            MediaKind::Document => "application/pdf",
            MediaKind::Audio => "audio/mpeg",
        }
    }

    pub fn default_prompt(self) -> &'static str {
        match self {
            MediaKind::Image => "Describe the image",
            MediaKind::Document => "Summarize the document",
            MediaKind::Audio => "Transcribe the audio",
        }
    }
}
