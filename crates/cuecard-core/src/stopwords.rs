use std::collections::HashSet;
use std::sync::LazyLock;

/// Common English function words excluded from keyphrase candidates.
const ENGLISH: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down",
    "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how",
    "however", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last",
    "latter", "least", "less", "made", "many", "may", "me", "meanwhile", "might", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither", "never",
    "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now", "nowhere",
    "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please",
    "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "several", "she",
    "should", "since", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "these", "they", "this", "those", "though", "through", "throughout", "thus", "to",
    "together", "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via",
    "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereas", "whereby", "wherein", "whether", "which", "while", "who", "whoever", "whole",
    "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
    "yours", "yourself", "yourselves",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH.iter().copied().collect());

/// `word` must already be lowercase.
#[must_use]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_words_are_stop_words() {
        for word in ["the", "is", "of", "and", "which"] {
            assert!(is_stop_word(word), "{word}");
        }
    }

    #[test]
    fn content_words_are_kept() {
        for word in ["photosynthesis", "respiration", "mitochondria", "glucose"] {
            assert!(!is_stop_word(word), "{word}");
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(!is_stop_word("The"));
    }
}
