//! Scour Core - Data model for the in-process search engine
//!
//! This crate provides the searchable-entity capability, query and result
//! types, configuration, and the error taxonomy shared by the engine.

pub mod config;
pub mod entity;
pub mod error;
pub mod query;
pub mod result;

pub use config::SearchConfig;
pub use entity::{NoteRecord, Searchable};
pub use error::{SearchError, SearchResult as Result};
pub use query::{FilterKind, SearchFilter, SearchQuery, SortDirection, SortKey};
pub use result::{ResultGroup, SearchResult, SearchResults};
