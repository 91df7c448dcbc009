//! The `Searchable` capability and a note adapter

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A record the engine can index and search.
///
/// Implemented by entity-specific adapters supplied by external
/// collaborators; the engine only consumes these, never constructs them.
pub trait Searchable: Send + Sync {
    /// Type name used for grouping and entity-type filters (e.g. "Note")
    fn entity_type(&self) -> &str;

    /// Stable identifier, unique within an entity type
    fn searchable_id(&self) -> &str;

    /// Primary searchable text (highest indexing weight)
    fn primary_text(&self) -> String;

    /// Secondary searchable text (medium indexing weight)
    fn secondary_text(&self) -> Option<String> {
        None
    }

    /// Named extra fields (lowest indexing weight)
    fn extra_fields(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Facet key/value pairs for faceted filtering
    fn facets(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Opaque payload carried through to results (not searched)
    fn raw_payload(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// A plain note record implementing [`Searchable`]
///
/// The canonical adapter for local note datasets; also used throughout
/// the engine's tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Stable identifier
    pub id: String,

    /// Entity type name, "Note" by default
    pub kind: String,

    /// Note title
    pub title: String,

    /// Note body
    #[serde(default)]
    pub content: String,

    /// Tags, exposed both as an extra field and as a "tag" facet
    #[serde(default)]
    pub tags: Vec<String>,

    /// Arbitrary payload handed back untouched with results
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl NoteRecord {
    /// Create a new note with the "Note" entity type
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "Note".to_string(),
            title: title.into(),
            content: String::new(),
            tags: Vec::new(),
            payload: serde_json::Value::Null,
        }
    }

    /// Set the entity type name
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the note body
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Attach an opaque payload
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

impl Searchable for NoteRecord {
    fn entity_type(&self) -> &str {
        &self.kind
    }

    fn searchable_id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> String {
        self.title.clone()
    }

    fn secondary_text(&self) -> Option<String> {
        if self.content.is_empty() {
            None
        } else {
            Some(self.content.clone())
        }
    }

    fn extra_fields(&self) -> Vec<(String, String)> {
        if self.tags.is_empty() {
            Vec::new()
        } else {
            vec![("tags".to_string(), self.tags.join(" "))]
        }
    }

    fn facets(&self) -> Option<HashMap<String, String>> {
        self.tags.first().map(|first| {
            let mut facets = HashMap::new();
            facets.insert("tag".to_string(), first.clone());
            facets
        })
    }

    fn raw_payload(&self) -> serde_json::Value {
        self.payload.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_record_builder() {
        let note = NoteRecord::new("n1", "Meeting Notes")
            .with_content("Discuss quarterly roadmap")
            .with_tag("work");

        assert_eq!(note.searchable_id(), "n1");
        assert_eq!(note.entity_type(), "Note");
        assert_eq!(note.primary_text(), "Meeting Notes");
        assert_eq!(
            note.secondary_text(),
            Some("Discuss quarterly roadmap".to_string())
        );
        assert_eq!(note.extra_fields(), vec![("tags".to_string(), "work".to_string())]);
    }

    #[test]
    fn test_note_record_facets() {
        let note = NoteRecord::new("n2", "Shopping List").with_tag("home");
        let facets = note.facets().unwrap();
        assert_eq!(facets.get("tag"), Some(&"home".to_string()));

        let untagged = NoteRecord::new("n3", "Untitled");
        assert!(untagged.facets().is_none());
        assert!(untagged.secondary_text().is_none());
    }
}
