use std::path::PathBuf;

use cuecard_document::{CUE_WORDS, DEFAULT_MAX_FILE_SIZE, MIN_LINE_CHARS};
use serde::{Deserialize, Serialize};

use crate::flashcard::TOP_K;
use crate::keyphrase::DEFAULT_MAX_NGRAM;
use crate::questions::{MAX_INPUT_TOKENS, MAX_OUTPUT_TOKENS};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub relevance: RelevanceConfig,
    #[serde(default)]
    pub keyphrase: KeyphraseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub flashcards: FlashcardsConfig,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_min_line_chars() -> usize {
    MIN_LINE_CHARS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Lines whose trimmed length does not exceed this are dropped.
    #[serde(default = "default_min_line_chars")]
    pub min_line_chars: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            min_line_chars: default_min_line_chars(),
        }
    }
}

fn default_cue_words() -> Vec<String> {
    CUE_WORDS.iter().map(|w| (*w).to_owned()).collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelevanceConfig {
    #[serde(default = "default_cue_words")]
    pub cue_words: Vec<String>,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            cue_words: default_cue_words(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyphraseBackend {
    /// Word-frequency scoring, no model calls.
    #[default]
    Frequency,
    /// Cosine similarity of candidate and sentence embeddings.
    Embedding,
}

impl KeyphraseBackend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::Embedding => "embedding",
        }
    }
}

impl std::fmt::Display for KeyphraseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_max_ngram() -> usize {
    DEFAULT_MAX_NGRAM
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyphraseConfig {
    #[serde(default)]
    pub backend: KeyphraseBackend,
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
}

impl Default for KeyphraseConfig {
    fn default() -> Self {
        Self {
            backend: KeyphraseBackend::default(),
            max_ngram: default_max_ngram(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    /// Scripted in-process provider; only usable in builds with the `mock` feature.
    Mock,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_model() -> String {
    "mistral:7b".into()
}

fn default_embedding_model() -> String {
    "qwen3-embedding".into()
}

fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Question generation model.
    #[serde(default = "default_model")]
    pub model: String,
    /// Question answering model; falls back to `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_model: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    #[must_use]
    pub fn answer_model(&self) -> &str {
        self.answer_model.as_deref().unwrap_or(&self.model)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: default_base_url(),
            model: default_model(),
            answer_model: None,
            embedding_model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_input_tokens() -> usize {
    MAX_INPUT_TOKENS
}

fn default_max_output_tokens() -> u32 {
    MAX_OUTPUT_TOKENS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// `tokenizer.json` of the generation model. Whitespace tokens are counted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer_path: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_input_tokens: default_max_input_tokens(),
            max_output_tokens: default_max_output_tokens(),
            tokenizer_path: None,
        }
    }
}

fn default_top_k() -> usize {
    TOP_K
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlashcardsConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for FlashcardsConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}
