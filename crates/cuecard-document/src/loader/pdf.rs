use std::future::Future;
use std::pin::Pin;

use crate::{DEFAULT_MAX_FILE_SIZE, DocumentError, DocumentParser, RawDocument};

#[derive(Debug)]
pub struct PdfParser {
    pub max_file_size: u64,
}

impl Default for PdfParser {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentParser for PdfParser {
    fn extract<'a>(
        &'a self,
        raw: &'a RawDocument,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DocumentError>> + Send + 'a>> {
        let max_size = self.max_file_size;
        Box::pin(async move {
            let len = raw.bytes.len() as u64;
            if len == 0 {
                return Err(DocumentError::Empty);
            }
            if len > max_size {
                return Err(DocumentError::FileTooLarge(len));
            }

            let bytes = raw.bytes.clone();
            // pdf-extract panics on some malformed inputs; a panicked task is a format error too.
            let pages = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem_by_pages(&bytes)
                    .map_err(|e| DocumentError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| DocumentError::Pdf(format!("parser aborted: {e}")))??;

            tracing::debug!(source = %raw.source, pages = pages.len(), "parsed PDF");
            Ok(pages)
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_bytes_fail_as_pdf_error() {
        let raw = RawDocument::new(b"definitely not a pdf".to_vec());
        let result = PdfParser::default().extract(&raw).await;
        assert!(matches!(result, Err(DocumentError::Pdf(_))));
    }

    #[tokio::test]
    async fn empty_pdf_rejected() {
        let raw = RawDocument::new(Vec::new());
        let result = PdfParser::default().extract(&raw).await;
        assert!(matches!(result, Err(DocumentError::Empty)));
    }

    #[test]
    fn supported_extensions_is_pdf() {
        let parser = PdfParser::default();
        assert_eq!(parser.supported_extensions(), &["pdf"]);
    }
}
