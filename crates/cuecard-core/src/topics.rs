use std::collections::HashMap;
use std::sync::Arc;

use crate::keyphrase::KeyphraseExtractor;
use crate::pipeline::PipelineError;

/// Insertion-ordered topic label to chunk text mapping.
///
/// Re-inserting a label replaces its text but keeps the position of the
/// first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TopicMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `text` under `topic`, returning the text it replaced.
    pub fn insert(&mut self, topic: impl Into<String>, text: impl Into<String>) -> Option<String> {
        let topic = topic.into();
        let text = text.into();
        if let Some(&pos) = self.index.get(&topic) {
            return Some(std::mem::replace(&mut self.entries[pos].1, text));
        }
        self.index.insert(topic.clone(), self.entries.len());
        self.entries.push((topic, text));
        None
    }

    /// Fold `other` into `self` with the same overwrite policy as [`insert`](Self::insert).
    pub fn merge(&mut self, other: TopicMap) {
        for (topic, text) in other.entries {
            if let Some(old) = self.insert(topic.as_str(), text) {
                tracing::debug!(topic = %topic, replaced_len = old.len(), "topic label collision");
            }
        }
    }

    #[must_use]
    pub fn get(&self, topic: &str) -> Option<&str> {
        self.index
            .get(topic)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), c.as_str()))
    }

    /// Split into parallel `(topics, chunks)` lists in map order.
    #[must_use]
    pub fn into_parallel(self) -> (Vec<String>, Vec<String>) {
        self.entries.into_iter().unzip()
    }
}

/// Labels each relevant sentence with its top keyphrase.
pub struct TopicSegmenter<K: KeyphraseExtractor> {
    extractor: Arc<K>,
}

impl<K: KeyphraseExtractor> TopicSegmenter<K> {
    #[must_use]
    pub fn new(extractor: Arc<K>) -> Self {
        Self { extractor }
    }

    /// Map every sentence to its keyphrase label, falling back to `Chunk_{i+1}`
    /// when no keyphrase exists. Later sentences overwrite earlier ones that
    /// share a label.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Extraction`] when the keyphrase extractor fails.
    pub async fn segment(&self, sentences: &[String]) -> Result<TopicMap, PipelineError> {
        let mut map = TopicMap::new();
        for (idx, sentence) in sentences.iter().enumerate() {
            let label = match self.extractor.top_keyphrase(sentence).await? {
                Some(kp) => kp.phrase,
                None => format!("Chunk_{}", idx + 1),
            };
            if map.insert(label.as_str(), sentence.as_str()).is_some() {
                tracing::debug!(topic = %label, "sentence overwrote earlier chunk");
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap as Map;

    use proptest::prelude::*;

    use super::*;
    use crate::keyphrase::{FrequencyKeyphraseExtractor, Keyphrase};

    /// Returns a fixed label per sentence; unknown sentences have no keyphrase.
    struct Scripted(Map<String, String>);

    impl KeyphraseExtractor for Scripted {
        async fn top_keyphrase(&self, text: &str) -> Result<Option<Keyphrase>, PipelineError> {
            Ok(self.0.get(text).map(|phrase| Keyphrase {
                phrase: phrase.clone(),
                score: 0.5,
            }))
        }
    }

    struct Broken;

    impl KeyphraseExtractor for Broken {
        async fn top_keyphrase(&self, _text: &str) -> Result<Option<Keyphrase>, PipelineError> {
            Err(PipelineError::Extraction("model offline".into()))
        }
    }

    fn scripted(pairs: &[(&str, &str)]) -> TopicSegmenter<Scripted> {
        let map = pairs
            .iter()
            .map(|(s, l)| ((*s).to_owned(), (*l).to_owned()))
            .collect();
        TopicSegmenter::new(Arc::new(Scripted(map)))
    }

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn insert_overwrite_keeps_first_position() {
        let mut map = TopicMap::new();
        assert!(map.insert("a", "one").is_none());
        map.insert("b", "two");
        assert_eq!(map.insert("a", "three").as_deref(), Some("one"));
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, [("a", "three"), ("b", "two")]);
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut doc = TopicMap::new();
        doc.insert("cell", "first");
        doc.insert("atp", "energy");
        let mut section = TopicMap::new();
        section.insert("cell", "second");
        section.insert("dna", "genes");
        doc.merge(section);

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get("cell"), Some("second"));
        let (topics, chunks) = doc.into_parallel();
        assert_eq!(topics, ["cell", "atp", "dna"]);
        assert_eq!(chunks, ["second", "energy", "genes"]);
    }

    #[tokio::test]
    async fn fallback_label_uses_one_based_index() {
        let segmenter = scripted(&[("Glucose is sugar.", "glucose")]);
        let map = segmenter
            .segment(&owned(&["It is so.", "Glucose is sugar.", "This is it."]))
            .await
            .unwrap();
        let labels: Vec<_> = map.iter().map(|(t, _)| t).collect();
        assert_eq!(labels, ["Chunk_1", "glucose", "Chunk_3"]);
    }

    #[tokio::test]
    async fn duplicate_label_keeps_later_sentence() {
        let segmenter = scripted(&[
            ("Cells divide by mitosis.", "mitosis"),
            ("Mitosis includes four phases.", "mitosis"),
        ]);
        let map = segmenter
            .segment(&owned(&[
                "Cells divide by mitosis.",
                "Mitosis includes four phases.",
            ]))
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("mitosis"), Some("Mitosis includes four phases."));
    }

    #[tokio::test]
    async fn extractor_failure_propagates() {
        let segmenter = TopicSegmenter::new(Arc::new(Broken));
        let result = segmenter.segment(&owned(&["Energy is defined."])).await;
        assert!(matches!(result, Err(PipelineError::Extraction(_))));
    }

    #[tokio::test]
    async fn empty_input_gives_empty_map() {
        let segmenter = TopicSegmenter::new(Arc::new(FrequencyKeyphraseExtractor::default()));
        assert!(segmenter.segment(&[]).await.unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn segmentation_is_deterministic(sentences in prop::collection::vec("[a-z ]{0,40}", 0..8)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let segmenter = TopicSegmenter::new(Arc::new(FrequencyKeyphraseExtractor::default()));
            let first = rt.block_on(segmenter.segment(&sentences)).unwrap();
            let second = rt.block_on(segmenter.segment(&sentences)).unwrap();
            prop_assert!(first.len() <= sentences.len());
            prop_assert_eq!(first, second);
        }
    }
}
