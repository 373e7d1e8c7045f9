use super::*;

fn service() -> LibraryService {
    let db = Database::in_memory().expect("failed to create in-memory database");
    LibraryService::new(db)
}

fn new_book(title: &str, domain: &[&str], theme: &[&str]) -> NewBook {
    NewBook {
        title: title.to_string(),
        domain_tags: domain.iter().map(|t| t.to_string()).collect(),
        theme_tags: theme.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn library_service_construction_with_in_memory_database() {
    let service = service();

    let count: i64 = service
        .database()
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table'",
            [],
            |row| row.get(0),
        )
        .expect("failed to query schema");

    assert!(count >= 3, "expected at least 3 tables (books, note_cards, tags)");
}

// --- Book CRUD ---

#[test]
fn create_book_returns_book_with_valid_id_and_tags() {
    let service = service();

    let book = service
        .create_book(&NewBook {
            title: "Thinking, Fast and Slow".to_string(),
            author: Some("Daniel Kahneman".to_string()),
            domain_tags: vec!["心理学".to_string(), "行为经济学".to_string()],
            theme_tags: vec!["决策".to_string()],
            ..Default::default()
        })
        .expect("failed to create book");

    assert!(book.id().get() > 0, "book ID should be positive");
    assert_eq!(book.author(), Some("Daniel Kahneman"));
    assert_eq!(book.domain_tags(), &["心理学", "行为经济学"]);
    assert_eq!(book.created_at(), book.updated_at());
}

#[test]
fn create_book_rejects_blank_title() {
    let service = service();

    let err = service
        .create_book(&new_book("   ", &[], &[]))
        .expect_err("blank title should be rejected");

    assert_eq!(
        err.downcast_ref::<LibraryError>(),
        Some(&LibraryError::EmptyTitle)
    );
}

#[test]
fn get_book_round_trips_stored_fields() {
    let service = service();
    let created = service
        .create_book(&NewBook {
            title: "Superforecasting".to_string(),
            description: Some("The art and science of prediction".to_string()),
            domain_tags: vec!["心理学".to_string()],
            theme_tags: vec!["决策".to_string(), "概率思维".to_string()],
            ..Default::default()
        })
        .unwrap();

    let fetched = service
        .get_book(created.id())
        .unwrap()
        .expect("book should exist");

    assert_eq!(fetched, created);
}

#[test]
fn get_book_returns_none_for_non_existent_id() {
    let service = service();

    assert_eq!(service.get_book(BookId::new(999)).unwrap(), None);
}

#[test]
fn update_book_merges_patch_and_bumps_updated_at() {
    let service = service();
    let created = service
        .create_book(&new_book("Draft", &["数学"], &["思维提升"]))
        .unwrap();

    let updated = service
        .update_book(
            created.id(),
            &BookPatch {
                title: Some("How to Solve It".to_string()),
                author: Some("George Pólya".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .expect("book should exist");

    assert_eq!(updated.title(), "How to Solve It");
    assert_eq!(updated.author(), Some("George Pólya"));
    assert_eq!(updated.domain_tags(), &["数学"]);
    assert!(updated.updated_at() >= created.updated_at());

    let fetched = service.get_book(created.id()).unwrap().unwrap();
    assert_eq!(fetched, updated);
}

#[test]
fn update_book_returns_none_when_missing() {
    let service = service();

    let result = service
        .update_book(BookId::new(42), &BookPatch::default())
        .unwrap();

    assert!(result.is_none());
}

#[test]
fn update_book_rejects_blank_title() {
    let service = service();
    let created = service.create_book(&new_book("Keep", &[], &[])).unwrap();

    let result = service.update_book(
        created.id(),
        &BookPatch {
            title: Some(String::new()),
            ..Default::default()
        },
    );

    assert!(result.is_err());
    assert_eq!(service.get_book(created.id()).unwrap().unwrap().title(), "Keep");
}

#[test]
fn delete_book_is_reported_once() {
    let service = service();
    let book = service.create_book(&new_book("Gone", &[], &[])).unwrap();

    assert!(service.delete_book(book.id()).unwrap());
    assert!(!service.delete_book(book.id()).unwrap());
    assert_eq!(service.get_book(book.id()).unwrap(), None);
}

#[test]
fn delete_book_cascades_only_its_own_notes() {
    let service = service();
    let doomed = service.create_book(&new_book("Doomed", &[], &[])).unwrap();
    let kept = service.create_book(&new_book("Kept", &[], &[])).unwrap();
    service
        .create_note(&NewNoteCard::new(doomed.id(), "a"))
        .unwrap();
    service
        .create_note(&NewNoteCard::new(doomed.id(), "b"))
        .unwrap();
    let survivor = service.create_note(&NewNoteCard::new(kept.id(), "c")).unwrap();

    service.delete_book(doomed.id()).unwrap();

    let notes = service.list_notes(None).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id(), survivor.id());
    assert!(service.list_notes(Some(doomed.id())).unwrap().is_empty());
}

// --- Note card CRUD ---

#[test]
fn create_note_applies_type_and_priority_defaults() {
    let service = service();
    let book = service.create_book(&new_book("Host", &[], &[])).unwrap();

    let note = service
        .create_note(&NewNoteCard {
            content: "Two systems of thought".to_string(),
            page_number: Some(20),
            chapter: Some("Part I".to_string()),
            ..NewNoteCard::new(book.id(), "System 1 and 2")
        })
        .unwrap();

    assert_eq!(note.note_type(), Some(NoteType::Concept));
    assert_eq!(note.priority(), Some(Priority::Medium));
    assert_eq!(note.page_number(), Some(20));
    assert_eq!(note.chapter(), Some("Part I"));

    let fetched = service.get_note(note.id()).unwrap().expect("note should exist");
    assert_eq!(fetched, note);
}

#[test]
fn create_note_requires_existing_book() {
    let service = service();

    let err = service
        .create_note(&NewNoteCard::new(BookId::new(77), "Orphan"))
        .expect_err("note on a missing book should be rejected");

    assert_eq!(
        err.downcast_ref::<LibraryError>(),
        Some(&LibraryError::BookNotFound(BookId::new(77)))
    );
}

#[test]
fn create_note_requires_title() {
    let service = service();
    let book = service.create_book(&new_book("Host", &[], &[])).unwrap();

    let err = service
        .create_note(&NewNoteCard::new(book.id(), ""))
        .expect_err("blank title should be rejected");

    assert_eq!(
        err.downcast_ref::<LibraryError>(),
        Some(&LibraryError::EmptyTitle)
    );
}

#[test]
fn update_note_merges_patch() {
    let service = service();
    let book = service.create_book(&new_book("Host", &[], &[])).unwrap();
    let note = service.create_note(&NewNoteCard::new(book.id(), "Loss aversion")).unwrap();

    let updated = service
        .update_note(
            note.id(),
            &NoteCardPatch {
                note_type: Some(NoteType::Quote),
                tags: Some(vec!["前景理论".to_string()]),
                ..Default::default()
            },
        )
        .unwrap()
        .expect("note should exist");

    assert_eq!(updated.title(), "Loss aversion");
    assert_eq!(updated.note_type(), Some(NoteType::Quote));
    assert_eq!(updated.tags(), &["前景理论"]);
    assert_eq!(service.get_note(note.id()).unwrap().unwrap(), updated);
}

#[test]
fn delete_note_reports_missing_notes() {
    let service = service();
    let book = service.create_book(&new_book("Host", &[], &[])).unwrap();
    let note = service.create_note(&NewNoteCard::new(book.id(), "x")).unwrap();

    assert!(service.delete_note(note.id()).unwrap());
    assert!(!service.delete_note(note.id()).unwrap());
}

#[test]
fn legacy_rows_without_type_or_priority_read_as_absent() {
    let service = service();
    let book = service.create_book(&new_book("Host", &[], &[])).unwrap();
    service
        .database()
        .connection()
        .execute(
            "INSERT INTO note_cards (book_id, title, created_at, updated_at) VALUES (?1, 'legacy', 0, 0)",
            [book.id().get()],
        )
        .unwrap();

    let notes = service.list_notes(Some(book.id())).unwrap();

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].note_type(), None);
    assert_eq!(notes[0].priority(), None);
    assert_eq!(crate::resolve_note_type(&notes[0]), NoteType::Concept);
}

// --- EntityStore reads ---

#[test]
fn list_books_orders_by_most_recently_updated() {
    let service = service();
    let first = service.create_book(&new_book("First", &[], &[])).unwrap();
    let second = service.create_book(&new_book("Second", &[], &[])).unwrap();
    // Same-millisecond writes tie on updated_at; pin distinct values.
    service
        .database()
        .connection()
        .execute("UPDATE books SET updated_at = 1000 WHERE id = ?1", [first.id().get()])
        .unwrap();
    service
        .database()
        .connection()
        .execute("UPDATE books SET updated_at = 2000 WHERE id = ?1", [second.id().get()])
        .unwrap();

    let titles: Vec<String> = service
        .list_books()
        .unwrap()
        .iter()
        .map(|b| b.title().to_string())
        .collect();

    assert_eq!(titles, vec!["Second", "First"]);
}

#[test]
fn list_notes_filters_by_book() {
    let service = service();
    let a = service.create_book(&new_book("A", &[], &[])).unwrap();
    let b = service.create_book(&new_book("B", &[], &[])).unwrap();
    service.create_note(&NewNoteCard::new(a.id(), "a1")).unwrap();
    service.create_note(&NewNoteCard::new(b.id(), "b1")).unwrap();
    service.create_note(&NewNoteCard::new(b.id(), "b2")).unwrap();

    assert_eq!(service.list_notes(None).unwrap().len(), 3);
    assert_eq!(service.list_notes(Some(a.id())).unwrap().len(), 1);
    assert!(
        service
            .list_notes(Some(b.id()))
            .unwrap()
            .iter()
            .all(|n| n.book_id() == b.id())
    );
}

#[test]
fn list_tags_puts_categories_first_and_filters_by_type() {
    let service = service();

    let domain = service.list_tags(Some(TagType::Domain)).unwrap();
    let theme = service.list_tags(Some(TagType::Theme)).unwrap();
    let all = service.list_tags(None).unwrap();

    assert!(domain.iter().all(|t| t.tag_type() == TagType::Domain));
    assert!(theme.iter().all(|t| t.tag_type() == TagType::Theme));
    assert_eq!(all.len(), domain.len() + theme.len());

    let first_leaf = domain
        .iter()
        .position(|t| !t.is_category())
        .expect("taxonomy has leaves");
    assert_eq!(first_leaf, 9, "all nine domain categories come first");
    assert!(domain[first_leaf..].iter().all(|t| !t.is_category()));
}
