//! Read-then-compute facade over an [`EntityStore`].

use anyhow::{Context, Result};
use log::info;
use time::OffsetDateTime;

use crate::{
    Book, EntityStore, KnowledgeGraph, NoteCard, QuerySpec, ReadingStats, SearchResult,
    build_graph, compute_stats, search,
};

/// Search, relation graph and statistics over one store.
///
/// Every call loads complete book and note snapshots first and then computes
/// on them. Nothing is cached between calls. A store failure aborts the call
/// with the store's error, annotated with which read failed.
///
/// # Examples
///
/// ```
/// use shelf::{Database, KnowledgeEngine, LibraryService, NewBook, QuerySpec};
///
/// # fn main() -> anyhow::Result<()> {
/// let service = LibraryService::new(Database::in_memory()?);
/// service.create_book(&NewBook {
///     title: "Deep Work".to_string(),
///     ..Default::default()
/// })?;
///
/// let engine = KnowledgeEngine::new(&service);
/// let result = engine.search(&QuerySpec::default())?;
/// assert_eq!(result.total, 1);
/// # Ok(())
/// # }
/// ```
pub struct KnowledgeEngine<S> {
    store: S,
}

impl<S: EntityStore> KnowledgeEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs a search over every book and note.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn search(&self, spec: &QuerySpec) -> Result<SearchResult> {
        let (books, notes) = self.snapshot()?;
        let result = search(books, notes, spec);
        info!(
            "event=search_complete module=engine query_len={} total={} returned={}",
            spec.query.chars().count(),
            result.total,
            result.books.len() + result.notes.len()
        );
        Ok(result)
    }

    /// Builds the book relation graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn build_relation_graph(&self) -> Result<KnowledgeGraph> {
        let (books, notes) = self.snapshot()?;
        let graph = build_graph(&books, &notes);
        info!(
            "event=graph_complete module=engine nodes={} links={} clusters={}",
            graph.nodes.len(),
            graph.links.len(),
            graph.clusters.len()
        );
        Ok(graph)
    }

    /// Computes statistics as of the current local time (UTC when the local
    /// offset cannot be determined).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn compute_stats(&self) -> Result<ReadingStats> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        self.compute_stats_at(now)
    }

    /// Computes statistics as of `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn compute_stats_at(&self, now: OffsetDateTime) -> Result<ReadingStats> {
        let (books, notes) = self.snapshot()?;
        Ok(compute_stats(&books, &notes, now))
    }

    fn snapshot(&self) -> Result<(Vec<Book>, Vec<NoteCard>)> {
        let books = self.store.list_books().context("failed to load books")?;
        let notes = self.store.list_notes(None).context("failed to load notes")?;
        Ok((books, notes))
    }
}
