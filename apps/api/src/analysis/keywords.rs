//! Keyword extraction — turns free text into a deduplicated list of significant words.

use std::collections::HashSet;

/// Tokens shorter than this (in bytes, all surviving chars are ASCII) are dropped.
const MIN_KEYWORD_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "her", "was", "one", "our",
    "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see", "two",
    "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "with", "have",
    "will", "this", "that", "from", "they", "been", "than", "then", "them", "what", "when",
    "your", "into", "time", "work", "year", "more", "over", "also",
];

/// Ordered, deduplicated keywords. Iteration follows first occurrence in the source text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    ordered: Vec<String>,
    index: HashSet<String>,
}

impl KeywordSet {
    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains(keyword)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    fn insert(&mut self, keyword: &str) {
        if self.index.insert(keyword.to_string()) {
            self.ordered.push(keyword.to_string());
        }
    }
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Lowercases, replaces everything except `a-z`, `0-9`, whitespace, `+` and `#`
/// with a space, then keeps tokens longer than two chars that are not stopwords.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+' || c == '#' || c.is_whitespace()
            {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut keywords = KeywordSet::default();
    for word in cleaned.split_whitespace() {
        if word.len() >= MIN_KEYWORD_LEN && !is_stopword(word) {
            keywords.insert(word);
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<String> {
        extract_keywords(text).iter().map(String::from).collect()
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(
            collect("Senior Engineer, (Backend) - REMOTE!"),
            vec!["senior", "engineer", "backend", "remote"]
        );
    }

    #[test]
    fn test_keeps_plus_and_hash_tokens() {
        let keywords = extract_keywords("Experts in C++ and C# wanted");
        assert!(keywords.contains("c++"));
        assert!(!keywords.contains("c#"), "c# is only two chars long");
        assert!(keywords.contains("experts"));
    }

    #[test]
    fn test_drops_short_tokens_and_stopwords() {
        let keywords = extract_keywords("we are the team you will love at an AI lab with rust");
        for word in keywords.iter() {
            assert!(word.len() > 2, "short token leaked: {word}");
            assert!(!is_stopword(word), "stopword leaked: {word}");
        }
        assert_eq!(collect("we are the team you will love"), vec!["team", "love"]);
    }

    #[test]
    fn test_deduplicates_preserving_first_occurrence() {
        assert_eq!(
            collect("rust python Rust kafka PYTHON"),
            vec!["rust", "python", "kafka"]
        );
    }

    #[test]
    fn test_dotted_names_split_into_parts() {
        assert_eq!(collect("node.js"), vec!["node"]);
    }

    #[test]
    fn test_non_ascii_letters_become_separators() {
        assert_eq!(collect("café résumé"), vec!["caf", "sum"]);
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("  \n\t ").is_empty());
    }

    #[test]
    fn test_year_is_a_stopword_but_years_is_not() {
        assert_eq!(collect("year years"), vec!["years"]);
    }
}
