use anyhow::Result;
use shelf::{Database, EntityStore, KnowledgeEngine, LibraryService, NewBook, NewNoteCard, QuerySpec};

fn book(title: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        domain_tags: vec!["哲学".to_string()],
        ..Default::default()
    }
}

#[test]
fn deleting_a_book_removes_it_and_its_notes() -> Result<()> {
    // Arrange
    let service = LibraryService::new(Database::in_memory()?);
    let doomed = service.create_book(&book("Meditations"))?.id();
    let kept = service.create_book(&book("Nicomachean Ethics"))?.id();
    service.create_note(&NewNoteCard::new(doomed, "On the shortness of life"))?;
    service.create_note(&NewNoteCard::new(doomed, "The view from above"))?;
    let survivor = service.create_note(&NewNoteCard::new(kept, "Virtue as habit"))?;

    // Act
    let deleted = service.delete_book(doomed)?;

    // Assert
    assert!(deleted);
    let books = service.list_books()?;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id(), kept);
    assert!(service.list_notes(Some(doomed))?.is_empty());
    let notes = service.list_notes(None)?;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id(), survivor.id());

    Ok(())
}

#[test]
fn engine_never_sees_orphaned_notes() -> Result<()> {
    let service = LibraryService::new(Database::in_memory()?);
    let doomed = service.create_book(&book("Meditations"))?.id();
    service.create_note(&NewNoteCard::new(doomed, "Memento mori"))?;

    service.delete_book(doomed)?;
    let result = KnowledgeEngine::new(&service).search(&QuerySpec {
        query: "memento".to_string(),
        ..Default::default()
    })?;

    assert_eq!(result.total, 0);

    Ok(())
}

#[test]
fn deleting_a_missing_book_reports_false() -> Result<()> {
    let service = LibraryService::new(Database::in_memory()?);
    let id = service.create_book(&book("Once"))?.id();

    assert!(service.delete_book(id)?);
    assert!(!service.delete_book(id)?);

    Ok(())
}

#[test]
fn cascade_persists_across_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("library.db");

    let doomed = {
        let service = LibraryService::new(Database::open(&path)?);
        let doomed = service.create_book(&book("Meditations"))?.id();
        service.create_note(&NewNoteCard::new(doomed, "Memento mori"))?;
        service.delete_book(doomed)?;
        doomed
    };

    let reopened = LibraryService::new(Database::open(&path)?);
    assert!(reopened.get_book(doomed)?.is_none());
    assert!(reopened.list_notes(None)?.is_empty());

    Ok(())
}
