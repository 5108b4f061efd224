use std::sync::Arc;

use cuecard_document::{
    AnyParser, DocumentParser, MIN_LINE_CHARS, RawDocument, RelevanceFilter, SentenceSegmenter,
    UnicodeSentenceSegmenter,
};
use cuecard_llm::{LlmProvider, Truncator, WhitespaceTruncator};

use crate::answers::{AnswerModel, AnswerRanker};
use crate::config::Config;
use crate::flashcard::{FlashcardSet, TOP_K};
use crate::keyphrase::KeyphraseExtractor;
use crate::pipeline::builder::{Chain, Start};
use crate::pipeline::{
    AnswerStep, ExtractStep, Pipeline, PipelineError, QuestionStep, SegmentStep,
};
use crate::questions::{MAX_INPUT_TOKENS, MAX_OUTPUT_TOKENS, QuestionGenerator};
use crate::topics::TopicSegmenter;

type Stages<K, P, A> =
    Chain<Chain<Chain<Start<ExtractStep>, SegmentStep<K>>, QuestionStep<P>>, AnswerStep<A>>;

/// Document in, ranked flashcards out.
///
/// Holds no per-document state; one instance can serve any number of
/// documents as long as its capabilities are reentrant.
pub struct FlashcardPipeline<K, P, A>
where
    K: KeyphraseExtractor,
    P: LlmProvider,
    A: AnswerModel,
{
    pipeline: Pipeline<Stages<K, P, A>>,
}

impl<K, P, A> FlashcardPipeline<K, P, A>
where
    K: KeyphraseExtractor,
    P: LlmProvider,
    A: AnswerModel,
{
    /// Start a builder from the three model capabilities. Everything else
    /// has an offline default.
    #[must_use]
    pub fn builder(
        keyphrases: Arc<K>,
        generator: Arc<P>,
        answers: Arc<A>,
    ) -> FlashcardPipelineBuilder<K, P, A> {
        FlashcardPipelineBuilder {
            keyphrases,
            generator,
            answers,
            parser: Arc::new(AnyParser::default()),
            segmenter: Arc::new(UnicodeSentenceSegmenter),
            filter: RelevanceFilter::default(),
            truncator: Arc::new(WhitespaceTruncator),
            min_line_chars: MIN_LINE_CHARS,
            max_input_tokens: MAX_INPUT_TOKENS,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            top_k: TOP_K,
        }
    }

    /// Run every stage over `raw`. An empty set means no section of the
    /// document held a relevant sentence.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure unchanged; no partial set is produced.
    pub async fn build_flashcards(&self, raw: RawDocument) -> Result<FlashcardSet, PipelineError> {
        let source = raw.source.clone();
        let set = self.pipeline.run(raw).await?;
        if set.is_empty() {
            tracing::info!(source, "no flashcards produced");
        } else {
            tracing::info!(source, flashcards = set.len(), "flashcards ready");
        }
        Ok(set)
    }
}

pub struct FlashcardPipelineBuilder<K, P, A>
where
    K: KeyphraseExtractor,
    P: LlmProvider,
    A: AnswerModel,
{
    keyphrases: Arc<K>,
    generator: Arc<P>,
    answers: Arc<A>,
    parser: Arc<dyn DocumentParser>,
    segmenter: Arc<dyn SentenceSegmenter>,
    filter: RelevanceFilter,
    truncator: Arc<dyn Truncator>,
    min_line_chars: usize,
    max_input_tokens: usize,
    max_output_tokens: u32,
    top_k: usize,
}

impl<K, P, A> FlashcardPipelineBuilder<K, P, A>
where
    K: KeyphraseExtractor,
    P: LlmProvider,
    A: AnswerModel,
{
    /// Apply the document, relevance, generation and flashcard sections of `config`.
    #[must_use]
    pub fn configure(mut self, config: &Config) -> Self {
        self.parser = Arc::new(AnyParser::with_max_file_size(config.document.max_file_size));
        self.min_line_chars = config.document.min_line_chars;
        self.filter = RelevanceFilter::new(&config.relevance.cue_words);
        self.max_input_tokens = config.generation.max_input_tokens;
        self.max_output_tokens = config.generation.max_output_tokens;
        self.top_k = config.flashcards.top_k;
        self
    }

    #[must_use]
    pub fn parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub fn segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    #[must_use]
    pub fn relevance(mut self, filter: RelevanceFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn truncator(mut self, truncator: Arc<dyn Truncator>) -> Self {
        self.truncator = truncator;
        self
    }

    #[must_use]
    pub fn min_line_chars(mut self, min_line_chars: usize) -> Self {
        self.min_line_chars = min_line_chars;
        self
    }

    #[must_use]
    pub fn generation_limits(mut self, max_input_tokens: usize, max_output_tokens: u32) -> Self {
        self.max_input_tokens = max_input_tokens;
        self.max_output_tokens = max_output_tokens;
        self
    }

    #[must_use]
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn build(self) -> FlashcardPipeline<K, P, A> {
        let questions = QuestionGenerator::new(self.generator, self.truncator)
            .with_limits(self.max_input_tokens, self.max_output_tokens);
        let ranker = AnswerRanker::new(self.answers).with_top_k(self.top_k);

        let pipeline = Pipeline::start(ExtractStep::new(self.parser, self.min_line_chars))
            .step(SegmentStep::new(
                self.segmenter,
                self.filter,
                TopicSegmenter::new(self.keyphrases),
            ))
            .step(QuestionStep::new(questions))
            .step(AnswerStep::new(ranker));

        FlashcardPipeline { pipeline }
    }
}
