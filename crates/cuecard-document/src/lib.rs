//! Turns raw document bytes into cleaned pages, heading-delimited sections and
//! the cue-word sentences the flashcard pipeline works from.

pub mod error;
pub mod extract;
pub mod loader;
pub mod relevance;
pub mod sections;
pub mod sentences;
pub mod types;

pub use error::DocumentError;
pub use extract::{MIN_LINE_CHARS, clean_page, extract_pages};
pub use loader::{AnyParser, TextParser};
pub use relevance::{CUE_WORDS, RelevanceFilter};
pub use sections::{reassemble, split_sections};
pub use sentences::{SentenceSegmenter, UnicodeSentenceSegmenter};
pub use types::{PageText, RawDocument, Section};

#[cfg(feature = "pdf")]
pub use loader::PdfParser;

/// Default maximum document size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Splits a raw document into per-page text, in page order.
pub trait DocumentParser: Send + Sync {
    fn extract<'a>(
        &'a self,
        raw: &'a RawDocument,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<String>, DocumentError>> + Send + 'a>,
    >;

    fn supported_extensions(&self) -> &[&str];
}
