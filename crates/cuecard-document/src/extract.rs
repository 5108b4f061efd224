use crate::{DocumentError, DocumentParser, PageText, RawDocument};

/// Lines whose trimmed length does not exceed this are treated as layout noise.
pub const MIN_LINE_CHARS: usize = 10;

/// Keep only lines whose trimmed length exceeds `min_chars`, rejoined with `\n`.
/// Kept lines are not trimmed.
#[must_use]
pub fn clean_page(raw: &str, min_chars: usize) -> String {
    raw.split('\n')
        .filter(|line| line.trim().chars().count() > min_chars)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse `raw` into cleaned pages. Pages left empty after cleaning are dropped.
///
/// # Errors
///
/// Returns the parser's error when the document cannot be read in its format.
pub async fn extract_pages(
    parser: &(dyn DocumentParser + '_),
    raw: &RawDocument,
    min_chars: usize,
) -> Result<Vec<PageText>, DocumentError> {
    let pages = parser.extract(raw).await?;
    let total = pages.len();

    let cleaned: Vec<PageText> = pages
        .iter()
        .enumerate()
        .filter_map(|(idx, page)| {
            let text = clean_page(page, min_chars);
            (!text.is_empty()).then_some(PageText {
                page: idx + 1,
                text,
            })
        })
        .collect();

    if cleaned.len() < total {
        tracing::debug!(
            source = %raw.source,
            dropped = total - cleaned.len(),
            "pages without usable text dropped"
        );
    }
    tracing::debug!(
        source = %raw.source,
        raw_pages = total,
        pages = cleaned.len(),
        "cleaned page text"
    );
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextParser;

    #[test]
    fn short_and_blank_lines_removed() {
        let raw = "Title\n\n   \nThis line is long enough.\nshort line\n0123456789A";
        assert_eq!(
            clean_page(raw, MIN_LINE_CHARS),
            "This line is long enough.\n0123456789A"
        );
    }

    #[test]
    fn padding_does_not_count_towards_length() {
        assert_eq!(clean_page("    0123456789    ", MIN_LINE_CHARS), "");
    }

    #[test]
    fn kept_lines_are_verbatim() {
        let raw = "  indented line with text  ";
        assert_eq!(clean_page(raw, MIN_LINE_CHARS), raw);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 10 characters, 20 bytes.
        assert_eq!(clean_page("éééééééééé", MIN_LINE_CHARS), "");
    }

    #[tokio::test]
    async fn empty_pages_dropped_and_numbered() {
        let raw = RawDocument::new(
            "tiny\x0cPhotosynthesis is how plants eat.\x0c\x0cRespiration releases energy."
                .as_bytes()
                .to_vec(),
        );
        let pages = extract_pages(&TextParser::default(), &raw, MIN_LINE_CHARS)
            .await
            .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 2);
        assert_eq!(pages[1].page, 4);
        assert_eq!(pages[1].text, "Respiration releases energy.");
    }

    #[tokio::test]
    async fn document_without_text_yields_no_pages() {
        let raw = RawDocument::new(b"a\nb\x0c   \x0cshort".to_vec());
        let pages = extract_pages(&TextParser::default(), &raw, MIN_LINE_CHARS)
            .await
            .unwrap();
        assert!(pages.is_empty());
    }

    mod proptest_extract {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn no_line_shorter_than_threshold(raw in "[a-zA-Z \\n]{0,400}") {
                let cleaned = clean_page(&raw, MIN_LINE_CHARS);
                if !cleaned.is_empty() {
                    for line in cleaned.split('\n') {
                        prop_assert!(line.chars().count() > MIN_LINE_CHARS);
                        prop_assert!(line.trim().chars().count() > MIN_LINE_CHARS);
                    }
                }
            }
        }
    }
}
