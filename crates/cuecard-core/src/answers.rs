use std::future::Future;
use std::sync::Arc;

use cuecard_llm::{Extractor, LlmError, LlmProvider};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::flashcard::{FlashcardSet, QaResult, TOP_K};
use crate::pipeline::PipelineError;

const ANSWER_PREAMBLE: &str = "You answer questions using only the given context. \
Copy the shortest span of the context that answers the question and rate your \
confidence that it is correct from 0 to 1.";

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub score: f32,
}

/// Extractive question answering over a context passage.
pub trait AnswerModel: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or its reply is malformed.
    fn answer(
        &self,
        question: &str,
        context: &str,
    ) -> impl Future<Output = Result<Answer, LlmError>> + Send;
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AnswerPayload {
    /// Answer span copied from the context.
    answer: String,
    /// Confidence between 0 and 1.
    score: f32,
}

/// [`AnswerModel`] backed by a chat model returning structured JSON.
pub struct LlmAnswerModel<P: LlmProvider> {
    provider: Arc<P>,
}

impl<P: LlmProvider> LlmAnswerModel<P> {
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

impl<P: LlmProvider> AnswerModel for LlmAnswerModel<P> {
    async fn answer(&self, question: &str, context: &str) -> Result<Answer, LlmError> {
        let input = format!("Question: {question}\nContext: {context}");
        let payload: AnswerPayload = Extractor::new(self.provider.as_ref())
            .with_preamble(ANSWER_PREAMBLE)
            .extract(&input)
            .await?;
        Ok(Answer {
            text: payload.answer.trim().to_owned(),
            score: payload.score,
        })
    }
}

/// Confidence forced into `[0, 1]`; NaN and `-0.0` become 0.
fn clamp_score(score: f32) -> f32 {
    if score.is_nan() || score <= 0.0 {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Answers every question against its chunk and keeps the best `top_k`.
pub struct AnswerRanker<A: AnswerModel> {
    model: Arc<A>,
    top_k: usize,
}

impl<A: AnswerModel> AnswerRanker<A> {
    #[must_use]
    pub fn new(model: Arc<A>) -> Self {
        Self { model, top_k: TOP_K }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// # Errors
    ///
    /// Returns [`PipelineError::GenerationService`] if any answer fails.
    pub async fn rank(
        &self,
        chunks: &[String],
        questions: &[String],
    ) -> Result<FlashcardSet, PipelineError> {
        let mut cards = Vec::with_capacity(chunks.len().min(questions.len()));
        for (chunk, question) in chunks.iter().zip(questions) {
            let answer = self.model.answer(question, chunk).await?;
            let score = clamp_score(answer.score);
            if !(0.0..=1.0).contains(&answer.score) {
                tracing::warn!(raw = answer.score, score, "answer score out of range, clamped");
            }
            cards.push(QaResult {
                question: question.clone(),
                answer: answer.text,
                score,
            });
        }
        let answered = cards.len();
        let set = FlashcardSet::top_k(cards, self.top_k);
        tracing::debug!(answered, kept = set.len(), "ranked answers");
        Ok(set)
    }
}
