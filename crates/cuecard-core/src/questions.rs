use std::sync::Arc;

use cuecard_llm::{LlmProvider, Truncator};

use crate::pipeline::PipelineError;

/// Prompt budget of the question generation model, in tokens.
pub const MAX_INPUT_TOKENS: usize = 512;
/// Longest generated question, in tokens.
pub const MAX_OUTPUT_TOKENS: u32 = 64;

/// Turns `(topic, chunk)` pairs into one question each.
pub struct QuestionGenerator<P: LlmProvider> {
    provider: Arc<P>,
    truncator: Arc<dyn Truncator>,
    max_input_tokens: usize,
    max_output_tokens: u32,
}

impl<P: LlmProvider> QuestionGenerator<P> {
    #[must_use]
    pub fn new(provider: Arc<P>, truncator: Arc<dyn Truncator>) -> Self {
        Self {
            provider,
            truncator,
            max_input_tokens: MAX_INPUT_TOKENS,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, max_input_tokens: usize, max_output_tokens: u32) -> Self {
        self.max_input_tokens = max_input_tokens;
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Truncated generation prompt for one pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the truncator fails.
    pub fn prompt(&self, topic: &str, chunk: &str) -> Result<String, PipelineError> {
        let prompt = format!("context: {topic} {chunk}");
        Ok(self.truncator.truncate(&prompt, self.max_input_tokens)?)
    }

    /// One question per pair, in input order. `topics` and `chunks` are zipped.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::GenerationService`] on the first failing pair;
    /// remaining pairs are not attempted.
    pub async fn generate(
        &self,
        topics: &[String],
        chunks: &[String],
    ) -> Result<Vec<String>, PipelineError> {
        let mut questions = Vec::with_capacity(topics.len().min(chunks.len()));
        for (topic, chunk) in topics.iter().zip(chunks) {
            let prompt = self.prompt(topic, chunk)?;
            let question = self
                .provider
                .generate(&prompt, self.max_output_tokens)
                .await?;
            tracing::debug!(topic = %topic, "generated question");
            questions.push(question.trim().to_owned());
        }
        Ok(questions)
    }
}
