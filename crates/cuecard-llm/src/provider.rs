use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

pub trait LlmProvider: Send + Sync {
    /// Complete `prompt` with the single best continuation, producing at most
    /// `max_tokens` tokens. Implementations must not sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or produces no output.
    fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Send messages to the model and return the assistant response.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate or the response is invalid.
    fn chat(&self, messages: &[Message]) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// # Errors
    ///
    /// Returns an error if the provider cannot produce embeddings.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, LlmError>> + Send;

    fn supports_embeddings(&self) -> bool;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn message_new_accepts_str_and_string() {
        let a = Message::new(Role::User, "hi");
        let b = Message::new(Role::System, String::from("sys"));
        assert_eq!(a.content, "hi");
        assert_eq!(b.role, Role::System);
    }
}
