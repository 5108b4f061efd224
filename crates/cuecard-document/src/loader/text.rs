use std::future::Future;
use std::pin::Pin;

use crate::{DEFAULT_MAX_FILE_SIZE, DocumentError, DocumentParser, RawDocument};

/// Form feed, the page separator `pdftotext` and similar tools emit.
const PAGE_BREAK: char = '\u{c}';

/// Plain text or Markdown; pages are separated by form feeds.
#[derive(Debug)]
pub struct TextParser {
    pub max_file_size: u64,
}

impl Default for TextParser {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentParser for TextParser {
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

            let content = std::str::from_utf8(&raw.bytes)
                .map_err(|e| DocumentError::Encoding(format!("{}: {e}", raw.source)))?;

            Ok(content.split(PAGE_BREAK).map(str::to_owned).collect())
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md", "markdown"]
    }
}
