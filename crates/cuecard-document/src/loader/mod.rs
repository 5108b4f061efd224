mod text;
#[cfg(feature = "pdf")]
mod pdf;

pub use text::TextParser;
#[cfg(feature = "pdf")]
pub use pdf::PdfParser;

use std::future::Future;
use std::pin::Pin;

use crate::{DocumentError, DocumentParser, RawDocument};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Picks a parser per document from its content type or leading bytes.
#[derive(Debug, Default)]
pub struct AnyParser {
    text: TextParser,
    #[cfg(feature = "pdf")]
    pdf: PdfParser,
}

impl AnyParser {
    #[must_use]
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self {
            text: TextParser { max_file_size },
            #[cfg(feature = "pdf")]
            pdf: PdfParser { max_file_size },
        }
    }

    fn is_pdf(raw: &RawDocument) -> bool {
        raw.content_type.as_deref() == Some("application/pdf") || raw.bytes.starts_with(PDF_MAGIC)
    }

    #[cfg(feature = "pdf")]
    fn extract_pdf<'a>(
        &'a self,
        raw: &'a RawDocument,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DocumentError>> + Send + 'a>> {
        self.pdf.extract(raw)
    }

    #[cfg(not(feature = "pdf"))]
    #[allow(clippy::unused_self)]
    fn extract_pdf<'a>(
        &'a self,
        _raw: &'a RawDocument,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DocumentError>> + Send + 'a>> {
        Box::pin(async {
            Err(DocumentError::UnsupportedFormat(
                "PDF support is not enabled in this build".to_owned(),
            ))
        })
    }
}

#[cfg(feature = "pdf")]
const EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];
#[cfg(not(feature = "pdf"))]
const EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

impl DocumentParser for AnyParser {
    fn extract<'a>(
        &'a self,
        raw: &'a RawDocument,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DocumentError>> + Send + 'a>> {
        if Self::is_pdf(raw) {
            self.extract_pdf(raw)
        } else {
            self.text.extract(raw)
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        EXTENSIONS
    }
}
