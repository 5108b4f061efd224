use std::path::Path;

use crate::DocumentError;

/// Uploaded document bytes. Owned by the request that submitted them.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub source: String,
    pub content_type: Option<String>,
}

impl RawDocument {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            source: "upload".to_owned(),
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a document from disk, guessing its content type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or exceeds `max_size` bytes.
    pub async fn read(path: &Path, max_size: u64) -> Result<Self, DocumentError> {
        let path = std::fs::canonicalize(path)?;

        let meta = tokio::fs::metadata(&path).await?;
        if meta.len() > max_size {
            return Err(DocumentError::FileTooLarge(meta.len()));
        }

        let content_type = match path.extension().and_then(|e| e.to_str()) {
            Some("pdf") => Some("application/pdf"),
            Some("md" | "markdown") => Some("text/markdown"),
            Some("txt") => Some("text/plain"),
            _ => None,
        };

        let bytes = tokio::fs::read(&path).await?;
        Ok(Self {
            bytes,
            source: path.display().to_string(),
            content_type: content_type.map(str::to_owned),
        })
    }
}

/// Cleaned text of one page: only lines longer than the noise threshold, joined by `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number in the source document.
    pub page: usize,
    pub text: String,
}

/// Part of a page delimited by a heading-like line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The delimiter that preceded this section, including its surrounding newlines.
    pub heading: Option<String>,
    pub text: String,
}

impl Section {
    /// Heading line without the surrounding newlines and padding.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.heading.as_deref().map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_hints() {
        let raw = RawDocument::new(b"abc".to_vec())
            .with_source("notes.txt")
            .with_content_type("text/plain");
        assert_eq!(raw.source, "notes.txt");
        assert_eq!(raw.content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn section_title_is_trimmed() {
        let section = Section {
            heading: Some("\nCELL BIOLOGY \n".into()),
            text: String::new(),
        };
        assert_eq!(section.title(), Some("CELL BIOLOGY"));
    }

    #[tokio::test]
    async fn read_guesses_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.md");
        std::fs::write(&file, "# Notes").unwrap();

        let raw = RawDocument::read(&file, 1024).await.unwrap();
        assert_eq!(raw.content_type.as_deref(), Some("text/markdown"));
        assert_eq!(raw.bytes, b"# Notes");
        let canonical = std::fs::canonicalize(&file).unwrap();
        assert_eq!(raw.source, canonical.display().to_string());
    }

    #[tokio::test]
    async fn read_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("big.txt");
        std::fs::write(&file, "xx").unwrap();

        let result = RawDocument::read(&file, 1).await;
        assert!(matches!(result, Err(DocumentError::FileTooLarge(2))));
    }

    #[tokio::test]
    async fn read_missing_file_is_io_error() {
        let result = RawDocument::read(Path::new("/nonexistent/file.pdf"), 1024).await;
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
