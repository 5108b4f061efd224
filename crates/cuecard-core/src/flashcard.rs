use serde::{Deserialize, Serialize};

/// Number of flashcards kept per document.
pub const TOP_K: usize = 5;

/// One flashcard: a generated question with its extracted answer and the
/// answering model's confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaResult {
    pub question: String,
    pub answer: String,
    pub score: f32,
}

/// `total_cmp` orders `-0.0` below `0.0`; collapse them so equal scores tie.
fn rank_key(score: f32) -> f32 {
    if score == 0.0 { 0.0 } else { score }
}

/// Ranked flashcards, highest confidence first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashcardSet {
    cards: Vec<QaResult>,
}

impl FlashcardSet {
    /// Stable-sort `cards` by descending score and keep the first `k`.
    #[must_use]
    pub fn top_k(mut cards: Vec<QaResult>, k: usize) -> Self {
        cards.sort_by(|a, b| rank_key(b.score).total_cmp(&rank_key(a.score)));
        cards.truncate(k);
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QaResult> {
        self.cards.iter()
    }

    #[must_use]
    pub fn cards(&self) -> &[QaResult] {
        &self.cards
    }
}

impl IntoIterator for FlashcardSet {
    type Item = QaResult;
    type IntoIter = std::vec::IntoIter<QaResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlashcardSet {
    type Item = &'a QaResult;
    type IntoIter = std::slice::Iter<'a, QaResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
