use std::future::Future;
use std::time::Duration;

use ollama_rs::Ollama;
use ollama_rs::generation::chat::ChatMessage;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::models::ModelOptions;

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message, Role};

#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Ollama,
    model: String,
    embedding_model: String,
    timeout: Option<Duration>,
}

impl OllamaProvider {
    #[must_use]
    pub fn new(base_url: &str, model: String, embedding_model: String) -> Self {
        let (host, port) = parse_host_port(base_url);
        Self {
            client: Ollama::new(host, port),
            model,
            embedding_model,
            timeout: None,
        }
    }

    /// Bound every request; an expired request surfaces as [`LlmError::Timeout`].
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if Ollama is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection to Ollama fails.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.bounded(async {
            self.client.list_local_models().await.map_err(|e| {
                LlmError::Other(format!("failed to connect to Ollama, is it running? {e}"))
            })
        })
        .await?;
        Ok(())
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, LlmError>>,
    ) -> Result<T, LlmError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| LlmError::Timeout {
                    provider: "ollama",
                    secs: limit.as_secs(),
                })?,
            None => fut.await,
        }
    }
}

impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let options = ModelOptions::default()
            .temperature(0.0)
            .num_predict(i32::try_from(max_tokens).unwrap_or(i32::MAX));
        let request = GenerationRequest::new(self.model.clone(), prompt.to_owned()).options(options);

        let response = self
            .bounded(async {
                self.client
                    .generate(request)
                    .await
                    .map_err(|e| LlmError::Other(format!("Ollama generate request failed: {e}")))
            })
            .await?;

        if response.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse { provider: "ollama" });
        }
        Ok(response.response)
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        let ollama_messages: Vec<ChatMessage> = messages.iter().map(convert_message).collect();
        let request = ChatMessageRequest::new(self.model.clone(), ollama_messages);

        let response = self
            .bounded(async {
                self.client
                    .send_chat_messages(request)
                    .await
                    .map_err(|e| LlmError::Other(format!("Ollama chat request failed: {e}")))
            })
            .await?;

        Ok(response.message.content)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = GenerateEmbeddingsRequest::new(
            self.embedding_model.clone(),
            EmbeddingsInput::from(text),
        );

        let response = self
            .bounded(async {
                self.client
                    .generate_embeddings(request)
                    .await
                    .map_err(|e| LlmError::Other(format!("Ollama embedding request failed: {e}")))
            })
            .await?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse { provider: "ollama" })
    }

    fn supports_embeddings(&self) -> bool {
        true
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ollama"
    }
}

fn convert_message(msg: &Message) -> ChatMessage {
    let text = msg.content.clone();
    match msg.role {
        Role::System => ChatMessage::system(text),
        Role::Assistant => ChatMessage::assistant(text),
        Role::User => ChatMessage::user(text),
    }
}

fn parse_host_port(url: &str) -> (String, u16) {
    let url = url.trim_end_matches('/');
    if let Some(colon_pos) = url.rfind(':') {
        let port_str = &url[colon_pos + 1..];
        if let Ok(port) = port_str.parse::<u16>() {
            let host = url[..colon_pos].to_string();
            return (host, port);
        }
    }
    (url.to_string(), 11434)
}
