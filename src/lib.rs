//! Personal knowledge base over books and note cards.
//!
//! The library stores books and their note cards in SQLite
//! ([`LibraryService`]) and answers three kinds of read queries through a
//! [`KnowledgeEngine`]: filtered and paginated [`search`], a tag-based book
//! relation graph ([`build_graph`]), and reading statistics
//! ([`compute_stats`]).

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod graph;
pub mod logging;
pub mod models;
pub mod search;
pub mod service;
pub mod stats;
pub mod store;
pub mod taxonomy;
pub mod utils;

pub use config::Config;
pub use db::Database;
pub use engine::KnowledgeEngine;
pub use error::{LibraryError, ParseValueError};
pub use graph::{
    Cluster, GraphNode, KnowledgeGraph, Point, Relation, RelationEdge, RelationType, build_graph,
    relate,
};
pub use models::{
    Book, BookBuilder, BookId, BookPatch, NewBook, NewNoteCard, NoteCard, NoteCardBuilder,
    NoteCardPatch, NoteId, NoteType, Priority, Tag, TagId, TagType, resolve_note_type,
    resolve_priority,
};
pub use search::{QuerySpec, SearchField, SearchResult, SortKey, SortOrder, search};
pub use service::LibraryService;
pub use stats::{DailyActivity, ReadingStats, compute_stats};
pub use store::EntityStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_accessible_from_crate_root() {
        let db = Database::in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn engine_runs_over_service_from_crate_root() {
        let service = LibraryService::new(Database::in_memory().unwrap());
        let engine = KnowledgeEngine::new(&service);

        let graph = engine.build_relation_graph().unwrap();

        assert_eq!(graph, KnowledgeGraph::default());
    }
}
