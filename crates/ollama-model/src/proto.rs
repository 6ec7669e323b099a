use docchat_model::{ModelFinishReason, ModelRequest};
use serde::{Deserialize, Serialize};

use crate::OllamaConfig;

// ------------------------------
// Types received from the server
// ------------------------------

/// One line of the `/api/generate` stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    pub done_reason: Option<String>,
    pub error: Option<String>,
}

impl GenerateChunk {
    #[inline]
    pub fn finish_reason(&self) -> ModelFinishReason {
        match self.done_reason.as_deref() {
            Some("length") => ModelFinishReason::Length,
            _ => ModelFinishReason::Stop,
        }
    }
}

/// The body of a failed (non-2xx) response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OllamaConfig,
) -> GenerateRequest {
    GenerateRequest {
        model: config.model.clone(),
        prompt: req.prompt.clone(),
        stream: true,
    }
}
