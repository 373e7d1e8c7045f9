//! Book relation graph built from shared tags.
//!
//! Every pair of books is scored by Jaccard-style overlap of their combined
//! domain and theme tags. Pairs scoring above [`LINK_THRESHOLD`] become
//! links. Books sharing a domain tag form clusters placed evenly on a circle.
//!
//! Pair scoring is quadratic in the number of books. Pairs are walked in
//! `i < j` order without being collected, and pairs whose tag sets are
//! disjoint are skipped before scoring.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::debug;
use serde::Serialize;

use crate::taxonomy::{FALLBACK_DOMAIN, domain_color};
use crate::{Book, BookId, NoteCard};

/// Links are emitted only for strengths strictly above this value.
pub const LINK_THRESHOLD: f64 = 0.2;

/// Radius of the circle cluster centers are placed on.
pub const CLUSTER_RADIUS: f64 = 200.0;

/// Minimum number of books sharing a domain tag to form a cluster.
pub const MIN_CLUSTER_SIZE: usize = 2;

const MIN_NODE_SIZE: usize = 3;
const MAX_NODE_SIZE: usize = 10;

/// Which tag dimension a relation rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// Only domain tags are shared.
    Domain,
    /// Only theme tags are shared.
    Theme,
    /// Both dimensions overlap, or the overlap does not split cleanly.
    Mixed,
}

/// Tag overlap between two books.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Shared domain tags followed by shared theme tags. A name present in
    /// both dimensions appears twice.
    pub shared_tags: Vec<String>,
    /// `|shared| / |union of all four tag lists|`, in `[0, 1]`.
    pub strength: f64,
    pub relation_type: RelationType,
}

/// A book as drawn in the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub domain_tags: Vec<String>,
    pub theme_tags: Vec<String>,
    /// Note count plus three, clamped to `3..=10`.
    pub size: usize,
    pub color: &'static str,
}

/// An undirected relation between two books (`source` precedes `target` in
/// the input order).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationEdge {
    pub source: BookId,
    pub target: BookId,
    pub strength: f64,
    pub shared_tags: Vec<String>,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
}

/// Layout position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Books sharing one domain tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub name: String,
    pub books: Vec<BookId>,
    pub center: Point,
    pub color: &'static str,
}

/// Snapshot of the relation graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<RelationEdge>,
    pub clusters: Vec<Cluster>,
}

/// Builds the graph over every book.
///
/// Returns an empty graph when `books` is empty.
///
/// # Examples
///
/// ```
/// use shelf::{BookBuilder, BookId, RelationType, build_graph};
///
/// let tags = |t: &[&str]| t.iter().map(|s| s.to_string()).collect::<Vec<_>>();
/// let books = vec![
///     BookBuilder::new().id(BookId::new(1)).title("A")
///         .domain_tags(tags(&["心理学"])).theme_tags(tags(&["决策"])).build(),
///     BookBuilder::new().id(BookId::new(2)).title("B")
///         .domain_tags(tags(&["心理学"])).theme_tags(tags(&["决策"])).build(),
/// ];
///
/// let graph = build_graph(&books, &[]);
/// assert_eq!(graph.links.len(), 1);
/// assert_eq!(graph.links[0].strength, 1.0);
/// assert_eq!(graph.links[0].relation_type, RelationType::Mixed);
/// assert_eq!(graph.clusters[0].name, "心理学");
/// ```
pub fn build_graph(books: &[Book], notes: &[NoteCard]) -> KnowledgeGraph {
    if books.is_empty() {
        return KnowledgeGraph::default();
    }

    let mut note_counts: HashMap<BookId, usize> = HashMap::new();
    for note in notes {
        *note_counts.entry(note.book_id()).or_default() += 1;
    }

    let nodes: Vec<GraphNode> = books
        .iter()
        .map(|book| node(book, note_counts.get(&book.id()).copied().unwrap_or(0)))
        .collect();

    let tag_sets: Vec<HashSet<&str>> = books.iter().map(combined_tags).collect();
    let links: Vec<RelationEdge> = candidate_pairs(&tag_sets)
        .filter_map(|(i, j)| {
            let relation = relate(&books[i], &books[j]);
            (relation.strength > LINK_THRESHOLD).then(|| RelationEdge {
                source: books[i].id(),
                target: books[j].id(),
                strength: relation.strength,
                shared_tags: relation.shared_tags,
                relation_type: relation.relation_type,
            })
        })
        .collect();

    let clusters = clusters(books);

    debug!(
        "event=graph_built module=graph nodes={} links={} clusters={}",
        nodes.len(),
        links.len(),
        clusters.len()
    );

    KnowledgeGraph {
        nodes,
        links,
        clusters,
    }
}

/// Scores the tag overlap between two books.
///
/// Shared tags within a dimension are counted as a multiset intersection,
/// so the score is symmetric even when a list repeats a tag. A zero-sized
/// union scores 0.
///
/// # Examples
///
/// ```
/// use shelf::{BookBuilder, BookId, relate};
///
/// let a = BookBuilder::new().id(BookId::new(1)).title("a").build();
/// let b = BookBuilder::new().id(BookId::new(2)).title("b").build();
/// assert_eq!(relate(&a, &b).strength, 0.0);
/// ```
pub fn relate(a: &Book, b: &Book) -> Relation {
    let shared_domain = intersect(a.domain_tags(), b.domain_tags());
    let shared_theme = intersect(a.theme_tags(), b.theme_tags());

    let relation_type = match (shared_domain.is_empty(), shared_theme.is_empty()) {
        (false, true) => RelationType::Domain,
        (true, false) => RelationType::Theme,
        _ => RelationType::Mixed,
    };

    let union: HashSet<&str> = a
        .domain_tags()
        .iter()
        .chain(a.theme_tags())
        .chain(b.domain_tags())
        .chain(b.theme_tags())
        .map(String::as_str)
        .collect();

    let mut shared_tags = shared_domain;
    shared_tags.extend(shared_theme);

    let strength = if union.is_empty() {
        0.0
    } else {
        // Cross-dimension name collisions can push the ratio past 1.
        (shared_tags.len() as f64 / union.len() as f64).min(1.0)
    };

    Relation {
        shared_tags,
        strength,
        relation_type,
    }
}

fn node(book: &Book, note_count: usize) -> GraphNode {
    let primary_domain = book
        .domain_tags()
        .first()
        .map(String::as_str)
        .unwrap_or(FALLBACK_DOMAIN);

    GraphNode {
        id: book.id(),
        title: book.title().to_string(),
        author: book.author().map(str::to_string),
        domain_tags: book.domain_tags().to_vec(),
        theme_tags: book.theme_tags().to_vec(),
        size: (note_count + MIN_NODE_SIZE).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE),
        color: domain_color(primary_domain),
    }
}

/// Tags of `a` that also occur in `b`, in `a`'s order. Each occurrence in
/// `b` can be matched once.
fn intersect(a: &[String], b: &[String]) -> Vec<String> {
    let mut pool: Vec<&str> = b.iter().map(String::as_str).collect();
    let mut shared = Vec::new();
    for tag in a {
        if let Some(pos) = pool.iter().position(|t| *t == tag.as_str()) {
            pool.swap_remove(pos);
            shared.push(tag.clone());
        }
    }
    shared
}

/// Each book's domain and theme tags as one set.
fn combined_tags(book: &Book) -> HashSet<&str> {
    book.domain_tags()
        .iter()
        .chain(book.theme_tags())
        .map(String::as_str)
        .collect()
}

/// Index pairs `(i, j)`, `i < j`, of books sharing at least one tag, in
/// ascending order. Pairs are produced lazily.
fn candidate_pairs<'a>(
    tag_sets: &'a [HashSet<&'a str>],
) -> impl Iterator<Item = (usize, usize)> + 'a {
    (0..tag_sets.len()).flat_map(move |i| {
        (i + 1..tag_sets.len())
            .filter(move |&j| !tag_sets[i].is_disjoint(&tag_sets[j]))
            .map(move |j| (i, j))
    })
}

/// Groups books by domain tag in first-seen order and keeps groups of at
/// least [`MIN_CLUSTER_SIZE`] books.
///
/// Centers are spaced by the number of distinct domain tags, including the
/// groups that were dropped, so surviving clusters keep gaps on the circle.
fn clusters(books: &[Book]) -> Vec<Cluster> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<BookId>> = HashMap::new();
    for book in books {
        for tag in book.domain_tags() {
            let members = groups.entry(tag.as_str()).or_insert_with(|| {
                order.push(tag.as_str());
                Vec::new()
            });
            // A book repeating a tag still counts once.
            if members.last() != Some(&book.id()) {
                members.push(book.id());
            }
        }
    }

    let slots = order.len() as f64;
    order
        .into_iter()
        .filter_map(|name| {
            let members = groups.remove(name)?;
            (members.len() >= MIN_CLUSTER_SIZE).then_some((name, members))
        })
        .enumerate()
        .map(|(index, (name, members))| {
            let angle = index as f64 * 2.0 * PI / slots;
            Cluster {
                name: name.to_string(),
                books: members,
                center: Point {
                    x: CLUSTER_RADIUS * angle.cos(),
                    y: CLUSTER_RADIUS * angle.sin(),
                },
                color: domain_color(name),
            }
        })
        .collect()
}
