//! Test-only mock provider with scripted responses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::LlmError;
use crate::provider::{LlmProvider, Message, Role};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub embeddings: HashMap<String, Vec<f32>>,
    pub supports_embeddings: bool,
    pub fail_generate: bool,
    pub fail_chat: bool,
    /// Fail every generate/chat call after this many successful ones.
    pub fail_after: Option<usize>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            default_response: "mock response".into(),
            embedding: vec![0.0; 8],
            embeddings: HashMap::new(),
            supports_embeddings: false,
            fail_generate: false,
            fail_chat: false,
            fail_after: None,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_generate: true,
            fail_chat: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fail_after(mut self, successes: usize) -> Self {
        self.fail_after = Some(successes);
        self
    }

    #[must_use]
    pub fn with_embedding_for(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.supports_embeddings = true;
        self.embeddings.insert(text.into(), vector);
        self
    }

    /// Prompts seen by `generate`, plus the last user message of every `chat`, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn respond(&self, prompt: String, fail: bool) -> Result<String, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if fail || self.fail_after.is_some_and(|limit| call >= limit) {
            return Err(LlmError::Unavailable);
        }
        self.prompts.lock().unwrap().push(prompt);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }
}

impl LlmProvider for MockProvider {
    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        self.respond(prompt.to_owned(), self.fail_generate)
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.respond(last_user, self.fail_chat)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if !self.supports_embeddings {
            return Err(LlmError::EmbedUnsupported { provider: "mock" });
        }
        Ok(self
            .embeddings
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.embedding.clone()))
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
