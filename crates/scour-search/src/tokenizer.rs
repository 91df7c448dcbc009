//! Text normalization for indexing and querying
//!
//! Deliberately simple: lowercase, split on non-alphanumeric, drop a
//! fixed stopword list. No stemming and no language-specific analysis.

/// Common English stopwords dropped during normalization
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "in", "is",
    "it", "of", "on", "or", "that", "the", "this", "to", "was", "were", "with",
];

/// Normalize text into lowercase alphanumeric search terms.
///
/// Pure and deterministic. Empty or all-stopword input yields an empty
/// vector, which callers treat as "no searchable content", not an error.
pub fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty() && !STOPWORDS.contains(s))
        .map(String::from)
        .collect()
}

/// Normalize and deduplicate, preserving first-seen order.
///
/// Used for query text, where each distinct term is looked up once.
pub fn normalize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    normalize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        let tokens = normalize("Hello, World!");
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_normalize_drops_stopwords() {
        let tokens = normalize("The quick fox and the hound");
        assert_eq!(tokens, vec!["quick", "fox", "hound"]);
    }

    #[test]
    fn test_normalize_punctuation_splits() {
        let tokens = normalize("meeting-notes: Q3/roadmap");
        assert_eq!(tokens, vec!["meeting", "notes", "q3", "roadmap"]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize("").is_empty());
        assert!(normalize("...---...").is_empty());
    }

    #[test]
    fn test_normalize_all_stopwords() {
        assert!(normalize("the and of").is_empty());
    }

    #[test]
    fn test_normalize_numbers() {
        let tokens = normalize("task 123 due2024");
        assert_eq!(tokens, vec!["task", "123", "due2024"]);
    }

    #[test]
    fn test_normalize_unique_preserves_order() {
        let tokens = normalize_unique("apple banana Apple cherry");
        assert_eq!(tokens, vec!["apple", "banana", "cherry"]);
    }
}
