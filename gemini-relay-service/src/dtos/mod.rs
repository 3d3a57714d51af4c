use serde::{Deserialize, Serialize};

/// Successful generation body: `{"output": "..."}`.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub output: String,
}

/// JSON body accepted by `/generate-text`.
#[derive(Debug, Default, Deserialize)]
pub struct PromptBody {
    #[serde(default)]
    pub prompt: Option<String>,
}
