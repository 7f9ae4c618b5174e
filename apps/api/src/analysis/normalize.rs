use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::stopwords::StopWords;

// Words (with internal apostrophes, hyphens or periods), or any single
// non-space symbol.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+(?:['’.\-]\w+)*|[^\w\s]").expect("token pattern is valid")
});

/// Splits text into word and punctuation tokens, in order.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Removes stop words from tokenized text.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: Arc<StopWords>,
    case_insensitive: bool,
}

impl Normalizer {
    pub fn new(stop_words: Arc<StopWords>, case_insensitive: bool) -> Self {
        Self {
            stop_words,
            case_insensitive,
        }
    }

    /// Surviving tokens joined by single spaces, original order and casing kept.
    pub fn normalize(&self, text: &str) -> String {
        tokenize(text)
            .into_iter()
            .filter(|token| !self.is_stop_word(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_stop_word(&self, token: &str) -> bool {
        if self.case_insensitive {
            self.stop_words.contains(&token.to_lowercase())
        } else {
            self.stop_words.contains(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(case_insensitive: bool) -> Normalizer {
        Normalizer::new(Arc::new(StopWords::english()), case_insensitive)
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(
            tokenize("Backend engineer, 5 years Go."),
            vec!["Backend", "engineer", ",", "5", "years", "Go", "."]
        );
    }

    #[test]
    fn test_tokenize_keeps_compound_words() {
        assert_eq!(
            tokenize("don't use e-mail with node.js v3.5"),
            vec!["don't", "use", "e-mail", "with", "node.js", "v3.5"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }

    #[test]
    fn test_normalize_removes_stop_words_in_order() {
        let out = normalizer(false).normalize("the engineer with a passion for distributed systems");
        assert_eq!(out, "engineer passion distributed systems");
    }

    #[test]
    fn test_normalize_is_case_sensitive_by_default() {
        let out = normalizer(false).normalize("The engineer and The team");
        assert_eq!(out, "The engineer The team");
    }

    #[test]
    fn test_normalize_case_insensitive_keeps_original_casing() {
        let out = normalizer(true).normalize("The Rust engineer AND the team");
        assert_eq!(out, "Rust engineer team");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        let out = normalizer(false).normalize("Rust\n\n   Go\tKafka");
        assert_eq!(out, "Rust Go Kafka");
    }

    #[test]
    fn test_normalize_only_stop_words_is_empty() {
        assert_eq!(normalizer(false).normalize("the and of to"), "");
    }
}
