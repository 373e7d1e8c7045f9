use anyhow::Result;
use shelf::{
    BookId, Database, KnowledgeEngine, LibraryService, NewBook, NewNoteCard, RelationType,
};

fn add_book(service: &LibraryService, title: &str, domain: &[&str], theme: &[&str]) -> Result<BookId> {
    let book = service.create_book(&NewBook {
        title: title.to_string(),
        domain_tags: domain.iter().map(|t| t.to_string()).collect(),
        theme_tags: theme.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    })?;
    Ok(book.id())
}

#[test]
fn empty_library_has_empty_graph() -> Result<()> {
    let service = LibraryService::new(Database::in_memory()?);

    let graph = KnowledgeEngine::new(&service).build_relation_graph()?;

    assert!(graph.nodes.is_empty());
    assert!(graph.links.is_empty());
    assert!(graph.clusters.is_empty());

    Ok(())
}

#[test]
fn identically_tagged_books_form_one_link_and_one_cluster() -> Result<()> {
    // Arrange
    let service = LibraryService::new(Database::in_memory()?);
    let first = add_book(&service, "Thinking Fast and Slow", &["心理学"], &["决策"])?;
    let second = add_book(&service, "Superforecasting", &["心理学"], &["决策"])?;

    // Act
    let graph = KnowledgeEngine::new(&service).build_relation_graph()?;

    // Assert
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.links.len(), 1);
    let link = &graph.links[0];
    assert_eq!(link.strength, 1.0);
    assert_eq!(link.relation_type, RelationType::Mixed);
    let mut endpoints = vec![link.source, link.target];
    endpoints.sort();
    assert_eq!(endpoints, vec![first, second]);

    assert_eq!(graph.clusters.len(), 1);
    assert_eq!(graph.clusters[0].name, "心理学");
    let mut members = graph.clusters[0].books.clone();
    members.sort();
    assert_eq!(members, vec![first, second]);

    Ok(())
}

#[test]
fn node_size_grows_with_notes() -> Result<()> {
    let service = LibraryService::new(Database::in_memory()?);
    let annotated = add_book(&service, "Annotated", &["数学"], &[])?;
    add_book(&service, "Bare", &[], &[])?;
    for i in 0..4 {
        service.create_note(&NewNoteCard::new(annotated, format!("note {i}")))?;
    }

    let graph = KnowledgeEngine::new(&service).build_relation_graph()?;

    let size_of = |id: BookId| graph.nodes.iter().find(|n| n.id == id).map(|n| n.size);
    assert_eq!(size_of(annotated), Some(7));
    assert!(graph.nodes.iter().any(|n| n.title == "Bare" && n.size == 3 && n.color == "#95A5A6"));

    Ok(())
}

#[test]
fn weak_overlap_produces_no_link() -> Result<()> {
    let service = LibraryService::new(Database::in_memory()?);
    // Shared 1 of a 6-tag union.
    add_book(&service, "Broad", &["数学", "哲学", "历史"], &["决策"])?;
    add_book(&service, "Other", &["数学", "文学"], &["元认知"])?;

    let graph = KnowledgeEngine::new(&service).build_relation_graph()?;

    assert!(graph.links.is_empty());
    assert_eq!(graph.clusters.len(), 1);
    assert_eq!(graph.clusters[0].name, "数学");

    Ok(())
}

#[test]
fn graph_serializes_for_visualization() -> Result<()> {
    let service = LibraryService::new(Database::in_memory()?);
    add_book(&service, "A", &["计算机"], &["架构"])?;
    add_book(&service, "B", &["计算机"], &["编程实践"])?;

    let graph = KnowledgeEngine::new(&service).build_relation_graph()?;
    let json = serde_json::to_value(&graph)?;

    assert_eq!(json["links"][0]["type"], "domain");
    assert_eq!(json["nodes"][0]["color"], "#96CEB4");
    assert!(json["clusters"][0]["center"]["x"].is_number());
    assert!(json["nodes"][0]["domainTags"].is_array());

    Ok(())
}
