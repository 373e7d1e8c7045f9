use anyhow::Result;
use shelf::{
    Database, KnowledgeEngine, LibraryService, NewBook, NewNoteCard, NoteType, Priority,
};
use time::OffsetDateTime;

#[test]
fn stats_reflect_freshly_created_entities() -> Result<()> {
    // Arrange
    let service = LibraryService::new(Database::in_memory()?);
    let book = service.create_book(&NewBook {
        title: "Atomic Habits".to_string(),
        domain_tags: vec!["心理学".to_string()],
        theme_tags: vec!["自我管理".to_string(), "习惯养成".to_string()],
        ..Default::default()
    })?;
    service.create_note(&NewNoteCard::new(book.id(), "Make it obvious"))?;
    service.create_note(&NewNoteCard {
        note_type: Some(NoteType::Application),
        priority: Some(Priority::High),
        ..NewNoteCard::new(book.id(), "Habit stacking")
    })?;
    let now = OffsetDateTime::now_utc();

    // Act
    let stats = KnowledgeEngine::new(&service).compute_stats_at(now)?;

    // Assert
    assert_eq!(stats.total_books, 1);
    assert_eq!(stats.total_notes, 2);
    assert_eq!(stats.books_this_month, 1);
    assert_eq!(stats.notes_this_month, 2);
    assert_eq!(stats.domain_distribution["心理学"], 1);
    assert_eq!(stats.theme_distribution.len(), 2);
    assert_eq!(stats.note_type_distribution[&NoteType::Concept], 1);
    assert_eq!(stats.note_type_distribution[&NoteType::Application], 1);
    assert_eq!(stats.priority_distribution[&Priority::Medium], 1);

    let today = stats.recent_activity.last().expect("thirty days of activity");
    assert_eq!(today.date, now.date());
    assert_eq!(today.books, 1);
    assert_eq!(today.notes, 2);

    Ok(())
}

#[test]
fn stats_on_empty_library() -> Result<()> {
    let service = LibraryService::new(Database::in_memory()?);

    let stats = KnowledgeEngine::new(&service).compute_stats()?;

    assert_eq!(stats.total_books, 0);
    assert_eq!(stats.recent_activity.len(), 30);
    assert!(stats.note_type_distribution.is_empty());

    Ok(())
}
