#[cfg(feature = "mock")]
use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

/// Generates a match over all `AnyProvider` variants, binding the inner provider
/// and evaluating the given expression for each arm.
macro_rules! delegate_provider {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyProvider::Ollama($p) => $expr,
            #[cfg(feature = "mock")]
            AnyProvider::Mock($p) => $expr,
        }
    };
}

#[derive(Debug, Clone)]
pub enum AnyProvider {
    Ollama(OllamaProvider),
    #[cfg(feature = "mock")]
    Mock(MockProvider),
}

impl AnyProvider {
    /// Verify the backend can serve requests. In-process providers always pass.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote backend is unreachable.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        match self {
            AnyProvider::Ollama(p) => p.health_check().await,
            #[cfg(feature = "mock")]
            AnyProvider::Mock(_) => Ok(()),
        }
    }
}

impl LlmProvider for AnyProvider {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        delegate_provider!(self, |p| p.generate(prompt, max_tokens).await)
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        delegate_provider!(self, |p| p.chat(messages).await)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        delegate_provider!(self, |p| p.embed(text).await)
    }

    fn supports_embeddings(&self) -> bool {
        delegate_provider!(self, |p| p.supports_embeddings())
    }

    fn name(&self) -> &str {
        delegate_provider!(self, |p| p.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_variant_delegates_name() {
        let provider = AnyProvider::Ollama(OllamaProvider::new(
            "http://localhost:11434",
            "m".into(),
            "e".into(),
        ));
        assert_eq!(provider.name(), "ollama");
        assert!(provider.supports_embeddings());
    }

    #[tokio::test]
    async fn unreachable_ollama_fails_health_check() {
        let provider = AnyProvider::Ollama(OllamaProvider::new(
            "http://127.0.0.1:1",
            "m".into(),
            "e".into(),
        ));
        assert!(provider.health_check().await.is_err());
    }

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn mock_variant_delegates_generate() {
        let provider = AnyProvider::Mock(MockProvider::with_responses(vec!["What is ATP?".into()]));
        assert_eq!(provider.name(), "mock");
        let out = provider.generate("context: atp text", 64).await.unwrap();
        assert_eq!(out, "What is ATP?");
    }
}
