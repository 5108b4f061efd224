//! The four stages of flashcard generation, in the order they run.

use std::sync::Arc;

use cuecard_document::{
    DocumentError, DocumentParser, PageText, RawDocument, RelevanceFilter, SentenceSegmenter,
    extract_pages, split_sections,
};
use cuecard_llm::LlmProvider;

use super::{PipelineError, Step};
use crate::answers::{AnswerModel, AnswerRanker};
use crate::flashcard::FlashcardSet;
use crate::keyphrase::KeyphraseExtractor;
use crate::questions::QuestionGenerator;
use crate::topics::{TopicMap, TopicSegmenter};

/// Raw bytes to cleaned pages.
pub struct ExtractStep {
    parser: Arc<dyn DocumentParser>,
    min_line_chars: usize,
}

impl ExtractStep {
    #[must_use]
    pub fn new(parser: Arc<dyn DocumentParser>, min_line_chars: usize) -> Self {
        Self {
            parser,
            min_line_chars,
        }
    }
}

impl Step for ExtractStep {
    type Input = RawDocument;
    type Output = Vec<PageText>;
    const NAME: &'static str = "extract";

    async fn run(&self, raw: RawDocument) -> Result<Vec<PageText>, PipelineError> {
        if raw.bytes.is_empty() {
            return Err(PipelineError::DocumentFormat(DocumentError::Empty));
        }
        let pages = extract_pages(self.parser.as_ref(), &raw, self.min_line_chars).await?;
        tracing::info!(source = %raw.source, pages = pages.len(), "extracted document text");
        Ok(pages)
    }
}

/// Pages to a document-wide topic map: split each page into sections, keep
/// the cue-word sentences of each section and label them by keyphrase.
pub struct SegmentStep<K: KeyphraseExtractor> {
    segmenter: Arc<dyn SentenceSegmenter>,
    filter: RelevanceFilter,
    topics: TopicSegmenter<K>,
}

impl<K: KeyphraseExtractor> SegmentStep<K> {
    #[must_use]
    pub fn new(
        segmenter: Arc<dyn SentenceSegmenter>,
        filter: RelevanceFilter,
        topics: TopicSegmenter<K>,
    ) -> Self {
        Self {
            segmenter,
            filter,
            topics,
        }
    }
}

impl<K: KeyphraseExtractor> Step for SegmentStep<K> {
    type Input = Vec<PageText>;
    type Output = TopicMap;
    const NAME: &'static str = "segment";

    async fn run(&self, pages: Vec<PageText>) -> Result<TopicMap, PipelineError> {
        let mut document = TopicMap::new();
        for page in &pages {
            for section in split_sections(&page.text) {
                let sentences = self.filter.filter(self.segmenter.as_ref(), &section.text)?;
                if sentences.is_empty() {
                    continue;
                }
                tracing::debug!(
                    page = page.page,
                    heading = section.title().unwrap_or_default(),
                    sentences = sentences.len(),
                    "segmenting section"
                );
                document.merge(self.topics.segment(&sentences).await?);
            }
        }
        tracing::info!(topics = document.len(), "segmented document into topics");
        Ok(document)
    }
}

/// Chunks paired with their generated questions, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBatch {
    pub chunks: Vec<String>,
    pub questions: Vec<String>,
}

pub struct QuestionStep<P: LlmProvider> {
    generator: QuestionGenerator<P>,
}

impl<P: LlmProvider> QuestionStep<P> {
    #[must_use]
    pub fn new(generator: QuestionGenerator<P>) -> Self {
        Self { generator }
    }
}

impl<P: LlmProvider> Step for QuestionStep<P> {
    type Input = TopicMap;
    type Output = QuestionBatch;
    const NAME: &'static str = "questions";

    async fn run(&self, topics: TopicMap) -> Result<QuestionBatch, PipelineError> {
        if topics.is_empty() {
            return Ok(QuestionBatch::default());
        }
        let (labels, chunks) = topics.into_parallel();
        let questions = self.generator.generate(&labels, &chunks).await?;
        tracing::info!(questions = questions.len(), "generated questions");
        Ok(QuestionBatch { chunks, questions })
    }
}

pub struct AnswerStep<A: AnswerModel> {
    ranker: AnswerRanker<A>,
}

impl<A: AnswerModel> AnswerStep<A> {
    #[must_use]
    pub fn new(ranker: AnswerRanker<A>) -> Self {
        Self { ranker }
    }
}

impl<A: AnswerModel> Step for AnswerStep<A> {
    type Input = QuestionBatch;
    type Output = FlashcardSet;
    const NAME: &'static str = "answers";

    async fn run(&self, batch: QuestionBatch) -> Result<FlashcardSet, PipelineError> {
        if batch.questions.is_empty() {
            return Ok(FlashcardSet::default());
        }
        let set = self.ranker.rank(&batch.chunks, &batch.questions).await?;
        tracing::info!(flashcards = set.len(), "ranked flashcards");
        Ok(set)
    }
}
