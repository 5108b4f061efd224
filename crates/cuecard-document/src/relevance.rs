use crate::{DocumentError, SentenceSegmenter};

/// Substrings that mark a sentence as definitional or procedural.
pub const CUE_WORDS: [&str; 4] = ["is", "steps", "includes", "defined"];

/// Keeps sentences whose lowercase form contains a cue word anywhere,
/// including inside longer words ("this" matches "is").
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    cue_words: Vec<String>,
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(CUE_WORDS)
    }
}

impl RelevanceFilter {
    #[must_use]
    pub fn new<I, S>(cue_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cue_words: cue_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn cue_words(&self) -> &[String] {
        &self.cue_words
    }

    #[must_use]
    pub fn is_relevant(&self, sentence: &str) -> bool {
        let lower = sentence.to_lowercase();
        self.cue_words.iter().any(|cue| lower.contains(cue.as_str()))
    }

    /// Segment `section` and keep the relevant sentences in order. An empty
    /// result is a normal outcome.
    ///
    /// # Errors
    ///
    /// Propagates segmenter failures.
    pub fn filter(
        &self,
        segmenter: &(dyn SentenceSegmenter + '_),
        section: &str,
    ) -> Result<Vec<String>, DocumentError> {
        let sentences = segmenter.segment(section)?;
        let total = sentences.len();
        let relevant: Vec<String> = sentences
            .into_iter()
            .filter(|s| self.is_relevant(s))
            .collect();
        tracing::debug!(total, relevant = relevant.len(), "filtered section sentences");
        Ok(relevant)
    }
}
