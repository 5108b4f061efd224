#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider unavailable")]
    Unavailable,

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("embedding not supported by {provider}")]
    EmbedUnsupported { provider: &'static str },

    #[error("{provider} request timed out after {secs}s")]
    Timeout { provider: &'static str, secs: u64 },

    #[error("model loading failed: {0}")]
    ModelLoad(String),

    #[error("tokenizer failed: {0}")]
    Tokenizer(String),

    #[error("structured output parse failed: {0}")]
    StructuredParse(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;
