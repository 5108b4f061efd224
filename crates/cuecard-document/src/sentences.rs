use unicode_segmentation::UnicodeSegmentation;

use crate::DocumentError;

/// Language-aware sentence boundary detection.
pub trait SentenceSegmenter: Send + Sync {
    /// Split `text` into sentences, in order. Each sentence must be a verbatim
    /// substring of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Segmentation`] if the backend fails.
    fn segment(&self, text: &str) -> Result<Vec<String>, DocumentError>;
}

const TERMINALS: &[char] = &['.', '!', '?', ':', '…'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '”', '’'];

/// UAX #29 sentence boundaries, with hard-wrapped lines rejoined.
///
/// UAX #29 ends a sentence at every line break. Text extracted from PDF pages
/// wraps mid-sentence, so a line that ends without terminal punctuation is
/// joined onto the next one. Heading-like lines (no lowercase letters) and
/// blank lines still end a sentence. Surrounding whitespace is stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>, DocumentError> {
        let mut sentences = Vec::new();
        let mut start = None;
        let mut bounds = text.split_sentence_bound_indices().peekable();

        while let Some((idx, piece)) = bounds.next() {
            let begin = *start.get_or_insert(idx);
            if bounds.peek().is_some() && is_wrapped(piece) {
                continue;
            }
            let sentence = text[begin..idx + piece.len()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_owned());
            }
            start = None;
        }
        Ok(sentences)
    }
}

/// Whether a UAX #29 segment was cut by a soft line wrap rather than a real
/// sentence end.
fn is_wrapped(piece: &str) -> bool {
    let Some(body) = piece.trim_end_matches([' ', '\t']).strip_suffix('\n') else {
        return false;
    };
    let body = body.strip_suffix('\r').unwrap_or(body);
    let line = body.rsplit('\n').next().unwrap_or(body).trim_end();
    let Some(last) = line.trim_end_matches(CLOSERS).chars().last() else {
        return false;
    };
    !TERMINALS.contains(&last) && line.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let sentences = UnicodeSentenceSegmenter
            .segment("Mitosis is cell division. It has four phases! Why?")
            .unwrap();
        assert_eq!(
            sentences,
            vec!["Mitosis is cell division.", "It has four phases!", "Why?"]
        );
    }

    #[test]
    fn wrapped_line_is_rejoined() {
        let text = "Photosynthesis converts light energy into chemical\n\
                    energy and this is how plants make food.";
        let sentences = UnicodeSentenceSegmenter.segment(text).unwrap();
        assert_eq!(sentences, vec![text]);
    }

    #[test]
    fn wrap_continues_across_several_lines() {
        let text = "Enzymes lower the\nactivation energy of\nreactions. Cells divide.";
        let sentences = UnicodeSentenceSegmenter.segment(text).unwrap();
        assert_eq!(
            sentences,
            vec![
                "Enzymes lower the\nactivation energy of\nreactions.",
                "Cells divide."
            ]
        );
    }

    #[test]
    fn punctuated_line_end_ends_sentence() {
        let sentences = UnicodeSentenceSegmenter
            .segment("First line ends here.\nSecond line.")
            .unwrap();
        assert_eq!(sentences, vec!["First line ends here.", "Second line."]);
    }

    #[test]
    fn heading_line_is_not_joined() {
        let sentences = UnicodeSentenceSegmenter
            .segment("BIOLOGY NOTES CHAPTER ONE\nOsmosis is passive.")
            .unwrap();
        assert_eq!(sentences, vec!["BIOLOGY NOTES CHAPTER ONE", "Osmosis is passive."]);
    }

    #[test]
    fn blank_line_ends_sentence() {
        let sentences = UnicodeSentenceSegmenter
            .segment("A title without stop\n\nBody text follows.")
            .unwrap();
        assert_eq!(sentences, vec!["A title without stop", "Body text follows."]);
    }

    #[test]
    fn blank_input_has_no_sentences() {
        assert!(UnicodeSentenceSegmenter.segment("   \n ").unwrap().is_empty());
    }

    #[test]
    fn sentences_are_substrings() {
        let text = "Osmosis is passive.  Diffusion too.\n\nActive transport needs\nATP here.";
        for sentence in UnicodeSentenceSegmenter.segment(text).unwrap() {
            assert!(text.contains(&sentence));
        }
    }
}
