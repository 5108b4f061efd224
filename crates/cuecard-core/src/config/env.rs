use std::path::PathBuf;
use std::str::FromStr;

use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_llm();
        self.apply_env_overrides_pipeline();
    }

    fn apply_env_overrides_llm(&mut self) {
        if let Ok(v) = std::env::var("CUECARD_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid CUECARD_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("CUECARD_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("CUECARD_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("CUECARD_LLM_ANSWER_MODEL") {
            self.llm.answer_model = Some(v);
        }
        if let Ok(v) = std::env::var("CUECARD_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Some(secs) = parsed_env("CUECARD_LLM_TIMEOUT") {
            self.llm.timeout_secs = secs;
        }
    }

    fn apply_env_overrides_pipeline(&mut self) {
        if let Some(bytes) = parsed_env("CUECARD_MAX_FILE_SIZE") {
            self.document.max_file_size = bytes;
        }
        if let Ok(v) = std::env::var("CUECARD_CUE_WORDS") {
            self.relevance.cue_words = v
                .split(',')
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = std::env::var("CUECARD_KEYPHRASE_BACKEND") {
            if let Ok(backend) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.keyphrase.backend = backend;
            } else {
                tracing::warn!("ignoring invalid CUECARD_KEYPHRASE_BACKEND value: {v}");
            }
        }
        if let Ok(v) = std::env::var("CUECARD_TOKENIZER_PATH") {
            self.generation.tokenizer_path = Some(PathBuf::from(v));
        }
        if let Some(k) = parsed_env("CUECARD_TOP_K") {
            self.flashcards.top_k = k;
        }
    }
}

/// Numeric override from `key`; unparseable values are logged and skipped.
pub(crate) fn parsed_env<T: FromStr>(key: &str) -> Option<T> {
    let v = std::env::var(key).ok()?;
    match v.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("ignoring invalid {key} value: {v}");
            None
        }
    }
}
