//! Model backends consumed by the flashcard pipeline: text generation,
//! structured question answering, embeddings and prompt truncation.

pub mod any;
pub mod error;
pub mod extractor;
#[cfg(feature = "mock")]
pub mod mock;
pub mod ollama;
pub mod provider;
pub mod truncate;

pub use error::LlmError;
pub use extractor::Extractor;
pub use provider::LlmProvider;
pub use truncate::{Truncator, WhitespaceTruncator};

#[cfg(feature = "tokenizers")]
pub use truncate::HfTruncator;
