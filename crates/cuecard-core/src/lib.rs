//! Document-to-flashcard pipeline: topic segmentation, question generation,
//! answer extraction and ranking, plus configuration loading.

pub mod answers;
pub mod config;
pub mod flashcard;
pub mod keyphrase;
pub mod orchestrator;
pub mod pipeline;
pub mod questions;
pub mod stopwords;
pub mod topics;

pub use answers::{Answer, AnswerModel, AnswerRanker, LlmAnswerModel};
pub use flashcard::{FlashcardSet, QaResult, TOP_K};
pub use keyphrase::{
    AnyKeyphraseExtractor, EmbeddingKeyphraseExtractor, FrequencyKeyphraseExtractor, Keyphrase,
    KeyphraseExtractor,
};
pub use orchestrator::{FlashcardPipeline, FlashcardPipelineBuilder};
pub use pipeline::PipelineError;
pub use questions::QuestionGenerator;
pub use topics::{TopicMap, TopicSegmenter};
