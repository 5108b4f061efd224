use std::sync::LazyLock;

use regex::Regex;

use crate::Section;

/// A line made only of three or more uppercase ASCII letters or spaces.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[A-Z ]{3,}\n").expect("valid heading regex"));

/// Split page text at heading lines, left to right, without reordering.
///
/// Text with no heading yields one section equal to the input. Adjacent headings
/// produce empty sections so that [`reassemble`] restores the input exactly.
#[must_use]
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut heading = None;
    let mut start = 0;

    for m in HEADING.find_iter(text) {
        sections.push(Section {
            heading: heading.take(),
            text: text[start..m.start()].to_owned(),
        });
        heading = Some(m.as_str().to_owned());
        start = m.end();
    }
    sections.push(Section {
        heading,
        text: text[start..].to_owned(),
    });

    sections
}

/// Inverse of [`split_sections`]: every section's delimiter followed by its text.
#[must_use]
pub fn reassemble(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        if let Some(heading) = &section.heading {
            out.push_str(heading);
        }
        out.push_str(&section.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_heading_is_single_section() {
        let text = "Cells are the unit of life.\nThey divide.";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text, text);
        assert!(sections[0].heading.is_none());
    }

    #[test]
    fn splits_on_uppercase_heading_line() {
        let text = "Intro text here.\nCELL BIOLOGY\nA cell is small.\nGENETICS\nDNA is defined as a molecule.";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].text, "Intro text here.");
        assert_eq!(sections[1].title(), Some("CELL BIOLOGY"));
        assert_eq!(sections[1].text, "A cell is small.");
        assert_eq!(sections[2].title(), Some("GENETICS"));
        assert_eq!(sections[2].text, "DNA is defined as a molecule.");
    }

    #[test]
    fn heading_at_start_of_text_needs_leading_newline() {
        let sections = split_sections("OVERVIEW\nBody text.");
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn two_letter_line_is_not_a_heading() {
        let sections = split_sections("before\nAB\nafter");
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn mixed_case_line_is_not_a_heading() {
        let sections = split_sections("before\nChapter One\nafter");
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn heading_at_end_leaves_empty_tail() {
        let sections = split_sections("body text\nSUMMARY\n");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].text, "");
    }

    #[test]
    fn reassemble_restores_input() {
        let text = "a\nONE\nb\nTWO\n\nc";
        assert_eq!(reassemble(&split_sections(text)), text);
    }

    mod proptest_sections {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn split_is_content_preserving(text in "[A-Za-z .\\n]{0,400}") {
                let sections = split_sections(&text);
                prop_assert!(!sections.is_empty());
                prop_assert_eq!(reassemble(&sections), text);
            }
        }
    }
}
