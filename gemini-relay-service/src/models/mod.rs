//! Domain models for the relay.

pub mod media;

pub use media::MediaKind;

/// Fallback prompt for `/generate-text`.
pub const DEFAULT_TEXT_PROMPT: &str = "Hello, Gemini!";

/// Resolve a submitted prompt against a route default.
///
/// Absent and empty prompts both fall back to the default.
pub fn prompt_or_default(prompt: Option<String>, default: &str) -> String {
    prompt
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| default.to_string())
}
