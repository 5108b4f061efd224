use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::LlmError;
use crate::provider::{LlmProvider, Message, Role};

/// Asks a chat model for a JSON object matching `T`'s schema and parses the reply.
pub struct Extractor<'a, P: LlmProvider> {
    provider: &'a P,
    preamble: Option<String>,
}

impl<'a, P: LlmProvider> Extractor<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            preamble: None,
        }
    }

    #[must_use]
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    /// # Errors
    ///
    /// Returns an error if the provider fails or the response cannot be parsed.
    pub async fn extract<T>(&self, input: &str) -> Result<T, LlmError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = serde_json::to_string(&schemars::schema_for!(T))?;
        let instruction =
            format!("Respond with a single JSON object matching this JSON schema:\n{schema}");
        let system = match &self.preamble {
            Some(preamble) => format!("{preamble}\n\n{instruction}"),
            None => instruction,
        };

        let messages = [Message::new(Role::System, system), Message::new(Role::User, input)];
        let response = self.provider.chat(&messages).await?;
        parse_json_object(&response)
    }
}

/// Parse the outermost `{...}` span of a model reply, tolerating code fences and chatter.
pub(crate) fn parse_json_object<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    let trimmed = raw.trim();
    let body = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => {
            return Err(LlmError::StructuredParse(format!(
                "no JSON object in response: {trimmed}"
            )));
        }
    };
    serde_json::from_str(body).map_err(|e| LlmError::StructuredParse(e.to_string()))
}
