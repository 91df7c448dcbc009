//! Search error types

use thiserror::Error;

/// Result type alias for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Search-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Query too short: minimum length is {minimum}")]
    QueryTooShort { minimum: usize },

    #[error("Invalid query {text:?}: {reason}")]
    InvalidQuery { text: String, reason: String },

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Search timed out")]
    SearchTimeout,

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),
}

impl SearchError {
    /// Whether the error is a caller-input problem rather than an engine fault.
    ///
    /// Input problems are returned to the caller without being logged
    /// at error level.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SearchError::QueryTooShort { .. } | SearchError::InvalidQuery { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::QueryTooShort { minimum: 2 };
        assert_eq!(err.to_string(), "Query too short: minimum length is 2");
    }

    #[test]
    fn test_input_error_classification() {
        assert!(SearchError::QueryTooShort { minimum: 2 }.is_input_error());
        assert!(SearchError::InvalidQuery {
            text: "the".into(),
            reason: "only stopwords".into()
        }
        .is_input_error());
        assert!(!SearchError::SearchTimeout.is_input_error());
        assert!(!SearchError::IndexingFailed("boom".into()).is_input_error());
    }
}
