//! Edit-distance fallback matching
//!
//! Scans the index vocabulary for terms within a similarity threshold of
//! a query term that had no exact hit. Cost is O(terms × term_length²),
//! acceptable only because the index is small and in-memory; the query
//! engine invokes this solely for terms with zero exact postings.

use crate::index::{IndexSnapshot, Posting};

/// Levenshtein edit distance over characters, not bytes.
///
/// Single-row DP; the usual O(nm) with O(m) space.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut dp: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, &ac) in a_chars.iter().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        for (j, &bc) in b_chars.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
        }
    }
    dp[b_chars.len()]
}

/// Edit-distance similarity in [0, 1]: `1 - distance / max(len)`
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Postings for index terms similar to `term`, scores discounted by
/// similarity.
///
/// Length difference is a lower bound on edit distance, so candidates
/// whose lengths already put them below the threshold are skipped before
/// running the DP.
pub fn fuzzy_match(snapshot: &IndexSnapshot, term: &str, threshold: f64) -> Vec<Posting> {
    let term_len = term.chars().count();
    let mut matches = Vec::new();

    for candidate in snapshot.terms() {
        let candidate_len = candidate.chars().count();
        let max_len = term_len.max(candidate_len);
        if max_len == 0 {
            continue;
        }

        let len_diff = term_len.abs_diff(candidate_len);
        if 1.0 - len_diff as f64 / (max_len as f64) < threshold {
            continue;
        }

        let score = similarity(term, candidate);
        if score >= threshold {
            if let Some(postings) = snapshot.lookup(candidate) {
                matches.extend(postings.iter().map(|p| Posting {
                    doc_id: p.doc_id.clone(),
                    entity_type: p.entity_type.clone(),
                    score: p.score * score,
                }));
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DocumentMetadata;
    use std::collections::HashMap;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("hello", "hello"), 0);
        assert_eq!(levenshtein("hello", "hallo"), 1);
        assert_eq!(levenshtein("hello", "hell"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_similarity_range() {
        assert!((similarity("meeting", "meeting") - 1.0).abs() < 1e-9);
        assert!((similarity("", "") - 1.0).abs() < 1e-9);
        assert!((similarity("abc", "xyz") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_misspelled_meeting() {
        // "mettings" vs "meeting": distance 2 over max length 8
        let s = similarity("mettings", "meeting");
        assert!((s - 0.75).abs() < 1e-9);
        assert!(s >= 0.7);
    }

    fn snapshot_with(term: &str, score: f64) -> IndexSnapshot {
        let mut snapshot = IndexSnapshot::new();
        let mut scores = HashMap::new();
        scores.insert(term.to_string(), score);
        snapshot.upsert(
            "n1",
            "Note",
            scores,
            DocumentMetadata {
                title: term.to_string(),
                subtitle: None,
                facets: None,
                payload: serde_json::Value::Null,
            },
        );
        snapshot
    }

    #[test]
    fn test_fuzzy_match_discounts_score() {
        let snapshot = snapshot_with("meeting", 0.6);

        let matches = fuzzy_match(&snapshot, "mettings", 0.7);
        assert_eq!(matches.len(), 1);
        // 0.6 * 0.75
        assert!((matches[0].score - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_match_respects_threshold() {
        let snapshot = snapshot_with("meeting", 0.6);
        assert!(fuzzy_match(&snapshot, "zebra", 0.7).is_empty());
        assert!(fuzzy_match(&snapshot, "mettings", 0.9).is_empty());
    }

    #[test]
    fn test_fuzzy_match_length_early_exit() {
        let snapshot = snapshot_with("meeting", 0.6);
        // Length difference alone puts "me" below 0.7
        assert!(fuzzy_match(&snapshot, "me", 0.7).is_empty());
    }
}
