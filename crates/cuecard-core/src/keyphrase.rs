use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use cuecard_llm::LlmProvider;
use unicode_segmentation::UnicodeSegmentation;

use crate::pipeline::PipelineError;
use crate::stopwords::is_stop_word;

/// Longest candidate phrase, in words.
pub const DEFAULT_MAX_NGRAM: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Keyphrase {
    pub phrase: String,
    pub score: f32,
}

/// Picks the single best short phrase describing a piece of text.
pub trait KeyphraseExtractor: Send + Sync {
    /// Best 1..=n word phrase of `text` excluding stop words, or `None` when
    /// no candidate survives.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Extraction`] when the backing model fails.
    fn top_keyphrase(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<Keyphrase>, PipelineError>> + Send;
}

/// Lowercase word tokens of at least two characters, stop words removed.
fn tokens(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= 2 && !is_stop_word(w))
        .collect()
}

/// Distinct n-grams of `tokens` for n in `1..=max_ngram`, ordered by start
/// position and then by length.
fn candidates(tokens: &[String], max_ngram: usize) -> Vec<Vec<String>> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for start in 0..tokens.len() {
        for len in 1..=max_ngram.max(1) {
            let Some(gram) = tokens.get(start..start + len) else {
                break;
            };
            if seen.insert(gram.join(" ")) {
                out.push(gram.to_vec());
            }
        }
    }
    out
}

/// Offline extractor: a phrase scores the mean frequency of its words,
/// normalized by the most frequent word. Ties go to the earliest candidate.
#[derive(Debug, Clone)]
pub struct FrequencyKeyphraseExtractor {
    max_ngram: usize,
}

impl Default for FrequencyKeyphraseExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NGRAM)
    }
}

impl FrequencyKeyphraseExtractor {
    #[must_use]
    pub fn new(max_ngram: usize) -> Self {
        Self {
            max_ngram: max_ngram.max(1),
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn best(&self, text: &str) -> Option<Keyphrase> {
        let tokens = tokens(text);
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *freq.entry(token.as_str()).or_default() += 1;
        }
        let max = freq.values().copied().max()? as f32;

        let mut best: Option<Keyphrase> = None;
        for gram in candidates(&tokens, self.max_ngram) {
            let total: usize = gram.iter().map(|w| freq[w.as_str()]).sum();
            let score = total as f32 / gram.len() as f32 / max;
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Keyphrase {
                    phrase: gram.join(" "),
                    score,
                });
            }
        }
        best
    }
}

impl KeyphraseExtractor for FrequencyKeyphraseExtractor {
    async fn top_keyphrase(&self, text: &str) -> Result<Option<Keyphrase>, PipelineError> {
        Ok(self.best(text))
    }
}

/// Ranks candidates by cosine similarity between their embedding and the
/// embedding of the whole text.
pub struct EmbeddingKeyphraseExtractor<P: LlmProvider> {
    provider: Arc<P>,
    max_ngram: usize,
}

impl<P: LlmProvider> EmbeddingKeyphraseExtractor<P> {
    #[must_use]
    pub fn new(provider: Arc<P>, max_ngram: usize) -> Self {
        Self {
            provider,
            max_ngram: max_ngram.max(1),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl<P: LlmProvider> KeyphraseExtractor for EmbeddingKeyphraseExtractor<P> {
    async fn top_keyphrase(&self, text: &str) -> Result<Option<Keyphrase>, PipelineError> {
        let grams = candidates(&tokens(text), self.max_ngram);
        if grams.is_empty() {
            return Ok(None);
        }
        let embed_err = |e: cuecard_llm::LlmError| {
            PipelineError::Extraction(format!("{} embedding failed: {e}", self.provider.name()))
        };

        let doc = self.provider.embed(text).await.map_err(embed_err)?;
        let mut best: Option<Keyphrase> = None;
        for gram in grams {
            let phrase = gram.join(" ");
            let vector = self.provider.embed(&phrase).await.map_err(embed_err)?;
            let score = cosine_similarity(&doc, &vector);
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Keyphrase { phrase, score });
            }
        }
        Ok(best)
    }
}

/// Keyphrase backend selected from configuration.
pub enum AnyKeyphraseExtractor<P: LlmProvider> {
    Frequency(FrequencyKeyphraseExtractor),
    Embedding(EmbeddingKeyphraseExtractor<P>),
}

impl<P: LlmProvider> KeyphraseExtractor for AnyKeyphraseExtractor<P> {
    async fn top_keyphrase(&self, text: &str) -> Result<Option<Keyphrase>, PipelineError> {
        match self {
            Self::Frequency(e) => e.top_keyphrase(text).await,
            Self::Embedding(e) => e.top_keyphrase(text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use cuecard_llm::mock::MockProvider;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn tokens_drop_stop_words_and_short_words() {
        let got = tokens("Photosynthesis is a process, in which plants make ATP.");
        assert_eq!(got, ["photosynthesis", "process", "plants", "make", "atp"]);
    }

    #[test]
    fn candidates_include_bigrams_once() {
        let toks: Vec<String> = ["cell", "wall", "cell", "wall"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let got: Vec<String> = candidates(&toks, 2)
            .into_iter()
            .map(|g| g.join(" "))
            .collect();
        assert_eq!(got, ["cell", "cell wall", "wall", "wall cell"]);
    }

    #[tokio::test]
    async fn frequency_prefers_repeated_word() {
        let extractor = FrequencyKeyphraseExtractor::default();
        let kp = extractor
            .top_keyphrase("Respiration releases energy; respiration includes glycolysis.")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kp.phrase, "respiration");
        assert!((kp.score - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn frequency_tie_goes_to_earliest() {
        let extractor = FrequencyKeyphraseExtractor::default();
        let kp = extractor
            .top_keyphrase("Photosynthesis is defined as light capture.")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kp.phrase, "photosynthesis");
    }

    #[tokio::test]
    async fn only_stop_words_yield_none() {
        let extractor = FrequencyKeyphraseExtractor::default();
        assert!(extractor.top_keyphrase("It is what it is.").await.unwrap().is_none());
        assert!(extractor.top_keyphrase("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn embedding_picks_closest_candidate() {
        let text = "Mitosis is cell division";
        let provider = MockProvider::default()
            .with_embedding_for(text, vec![1.0, 0.0])
            .with_embedding_for("mitosis", vec![0.9, 0.1])
            .with_embedding_for("cell", vec![0.0, 1.0])
            .with_embedding_for("division", vec![0.5, 0.5]);
        let extractor = EmbeddingKeyphraseExtractor::new(Arc::new(provider), 1);
        let kp = extractor.top_keyphrase(text).await.unwrap().unwrap();
        assert_eq!(kp.phrase, "mitosis");
    }

    #[tokio::test]
    async fn embedding_failure_is_extraction_error() {
        let extractor = EmbeddingKeyphraseExtractor::new(Arc::new(MockProvider::default()), 2);
        let result = extractor.top_keyphrase("Enzymes are defined proteins").await;
        assert!(matches!(result, Err(PipelineError::Extraction(_))));
    }

    #[tokio::test]
    async fn any_dispatches_to_frequency() {
        let extractor: AnyKeyphraseExtractor<MockProvider> =
            AnyKeyphraseExtractor::Frequency(FrequencyKeyphraseExtractor::new(1));
        let kp = extractor.top_keyphrase("Osmosis moves water").await.unwrap();
        assert_eq!(kp.unwrap().phrase, "osmosis");
    }

    proptest! {
        #[test]
        fn frequency_is_deterministic_and_bounded(text in "[a-zA-Z ,.]{0,200}") {
            let extractor = FrequencyKeyphraseExtractor::default();
            let first = extractor.best(&text);
            prop_assert_eq!(&first, &extractor.best(&text));
            if let Some(kp) = first {
                prop_assert!(kp.score > 0.0 && kp.score <= 1.0);
                prop_assert!(kp.phrase.split(' ').count() <= 2);
            }
        }
    }
}
