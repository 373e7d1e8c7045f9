use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{OptionalExtension, Row};
use time::OffsetDateTime;

use crate::db::{from_millis, to_millis};
use crate::{
    Book, BookBuilder, BookId, BookPatch, Database, EntityStore, LibraryError, NewBook,
    NewNoteCard, NoteCard, NoteCardBuilder, NoteCardPatch, NoteId, NoteType, Priority, Tag, TagId,
    TagType,
};

const BOOK_COLUMNS: &str =
    "id, title, author, description, domain_tags, theme_tags, created_at, updated_at";

const NOTE_COLUMNS: &str = "id, book_id, title, content, note_type, tags, page_number, chapter, \
     priority, created_at, updated_at";

/// Service layer providing book, note card and tag management.
///
/// LibraryService owns a Database instance and implements the
/// [`EntityStore`] read contract on top of it, so it can be handed straight
/// to a [`KnowledgeEngine`](crate::KnowledgeEngine). It is UI-independent
/// and can be used by the CLI or any other driver.
///
/// # Examples
///
/// ```
/// use shelf::{Database, LibraryService};
///
/// # fn main() -> anyhow::Result<()> {
/// let db = Database::in_memory()?;
/// let service = LibraryService::new(db);
/// # Ok(())
/// # }
/// ```
pub struct LibraryService {
    db: Database,
}

impl LibraryService {
    /// Creates a new LibraryService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    ///
    /// Useful for testing or advanced operations that need direct database access.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates a new book.
    ///
    /// Sets both timestamps to now and returns the stored book with its
    /// assigned `BookId`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::EmptyTitle`] if the title is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::{Database, LibraryService, NewBook};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let service = LibraryService::new(Database::in_memory()?);
    ///
    /// let book = service.create_book(&NewBook {
    ///     title: "Thinking, Fast and Slow".to_string(),
    ///     domain_tags: vec!["心理学".to_string()],
    ///     ..Default::default()
    /// })?;
    /// assert!(book.id().get() > 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_book(&self, new_book: &NewBook) -> Result<Book> {
        if new_book.title.trim().is_empty() {
            return Err(LibraryError::EmptyTitle.into());
        }

        let now = now_millis()?;
        let stamp = to_millis(now);
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO books (title, author, description, domain_tags, theme_tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &new_book.title,
                &new_book.author,
                &new_book.description,
                serde_json::to_string(&new_book.domain_tags)?,
                serde_json::to_string(&new_book.theme_tags)?,
                stamp,
                stamp,
            ),
        )?;
        let id = BookId::new(conn.last_insert_rowid());
        debug!("event=book_created module=service id={id}");

        let mut builder = BookBuilder::new()
            .id(id)
            .title(new_book.title.as_str())
            .domain_tags(new_book.domain_tags.clone())
            .theme_tags(new_book.theme_tags.clone())
            .created_at(now)
            .updated_at(now);
        if let Some(author) = &new_book.author {
            builder = builder.author(author.as_str());
        }
        if let Some(description) = &new_book.description {
            builder = builder.description(description.as_str());
        }
        Ok(builder.build())
    }

    /// Retrieves a book by its ID.
    ///
    /// Returns `None` if no book exists with the given ID.
    pub fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        let row = self
            .db
            .connection()
            .query_row(
                &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
                [id.get()],
                BookRow::read,
            )
            .optional()?;

        row.map(BookRow::into_book).transpose()
    }

    /// Applies a partial update to a book and bumps its `updated_at`.
    ///
    /// Returns `None` if the book does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::EmptyTitle`] if the patch sets a blank title.
    pub fn update_book(&self, id: BookId, patch: &BookPatch) -> Result<Option<Book>> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(LibraryError::EmptyTitle.into());
        }
        let Some(existing) = self.get_book(id)? else {
            return Ok(None);
        };

        let updated = patch.apply(&existing, now_millis()?);
        self.db.connection().execute(
            "UPDATE books
             SET title = ?1, author = ?2, description = ?3, domain_tags = ?4, theme_tags = ?5, updated_at = ?6
             WHERE id = ?7",
            (
                updated.title(),
                updated.author(),
                updated.description(),
                serde_json::to_string(updated.domain_tags())?,
                serde_json::to_string(updated.theme_tags())?,
                to_millis(updated.updated_at()),
                id.get(),
            ),
        )?;

        Ok(Some(updated))
    }

    /// Deletes a book together with all of its note cards.
    ///
    /// Both deletes run in one transaction, so a crash between them cannot
    /// leave orphaned notes behind. Returns `false` if the book did not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf::{Database, EntityStore, LibraryService, NewBook, NewNoteCard};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let service = LibraryService::new(Database::in_memory()?);
    /// let book = service.create_book(&NewBook { title: "Doomed".into(), ..Default::default() })?;
    /// service.create_note(&NewNoteCard::new(book.id(), "Goes too"))?;
    ///
    /// assert!(service.delete_book(book.id())?);
    /// assert!(service.list_notes(None)?.is_empty());
    /// assert!(!service.delete_book(book.id())?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn delete_book(&self, id: BookId) -> Result<bool> {
        let conn = self.db.connection();
        let tx = conn.unchecked_transaction()?;

        let notes_removed = tx.execute("DELETE FROM note_cards WHERE book_id = ?1", [id.get()])?;
        let books_removed = tx.execute("DELETE FROM books WHERE id = ?1", [id.get()])?;

        tx.commit()?;

        if books_removed > 0 {
            info!("event=book_deleted module=service id={id} notes_removed={notes_removed}");
        }
        Ok(books_removed > 0)
    }

    /// Creates a note card on an existing book.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::EmptyTitle`] if the title is blank and
    /// [`LibraryError::BookNotFound`] if the book does not exist.
    pub fn create_note(&self, new_note: &NewNoteCard) -> Result<NoteCard> {
        if new_note.title.trim().is_empty() {
            return Err(LibraryError::EmptyTitle.into());
        }
        if !self.book_exists(new_note.book_id)? {
            return Err(LibraryError::BookNotFound(new_note.book_id).into());
        }

        let now = now_millis()?;
        let stamp = to_millis(now);
        let note_type = new_note.note_type.unwrap_or_default();
        let priority = new_note.priority.unwrap_or_default();
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO note_cards (book_id, title, content, note_type, tags, page_number, chapter, priority, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            (
                new_note.book_id.get(),
                &new_note.title,
                &new_note.content,
                note_type.as_str(),
                serde_json::to_string(&new_note.tags)?,
                new_note.page_number,
                &new_note.chapter,
                priority.as_str(),
                stamp,
                stamp,
            ),
        )?;
        let id = NoteId::new(conn.last_insert_rowid());
        debug!(
            "event=note_created module=service id={id} book_id={}",
            new_note.book_id
        );

        let mut builder = NoteCardBuilder::new()
            .id(id)
            .book_id(new_note.book_id)
            .title(new_note.title.as_str())
            .content(new_note.content.as_str())
            .note_type(note_type)
            .priority(priority)
            .tags(new_note.tags.clone())
            .created_at(now)
            .updated_at(now);
        if let Some(page) = new_note.page_number {
            builder = builder.page_number(page);
        }
        if let Some(chapter) = &new_note.chapter {
            builder = builder.chapter(chapter.as_str());
        }
        Ok(builder.build())
    }

    /// Retrieves a note card by its ID.
    pub fn get_note(&self, id: NoteId) -> Result<Option<NoteCard>> {
        let row = self
            .db
            .connection()
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM note_cards WHERE id = ?1"),
                [id.get()],
                NoteRow::read,
            )
            .optional()?;

        row.map(NoteRow::into_note).transpose()
    }

    /// Applies a partial update to a note card and bumps its `updated_at`.
    ///
    /// Returns `None` if the note does not exist.
    pub fn update_note(&self, id: NoteId, patch: &NoteCardPatch) -> Result<Option<NoteCard>> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(LibraryError::EmptyTitle.into());
        }
        let Some(existing) = self.get_note(id)? else {
            return Ok(None);
        };

        let updated = patch.apply(&existing, now_millis()?);
        self.db.connection().execute(
            "UPDATE note_cards
             SET title = ?1, content = ?2, note_type = ?3, tags = ?4, page_number = ?5, chapter = ?6, priority = ?7, updated_at = ?8
             WHERE id = ?9",
            (
                updated.title(),
                updated.content(),
                updated.note_type().map(NoteType::as_str),
                serde_json::to_string(updated.tags())?,
                updated.page_number(),
                updated.chapter(),
                updated.priority().map(Priority::as_str),
                to_millis(updated.updated_at()),
                id.get(),
            ),
        )?;

        Ok(Some(updated))
    }

    /// Deletes a note card. Returns `false` if it did not exist.
    pub fn delete_note(&self, id: NoteId) -> Result<bool> {
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM note_cards WHERE id = ?1", [id.get()])?;
        Ok(removed > 0)
    }

    fn book_exists(&self, id: BookId) -> Result<bool> {
        let exists: bool = self.db.connection().query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1)",
            [id.get()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl EntityStore for LibraryService {
    fn list_books(&self) -> Result<Vec<Book>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY updated_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], BookRow::read)?;

        let mut books = Vec::new();
        for row_result in rows {
            books.push(row_result?.into_book()?);
        }
        Ok(books)
    }

    fn list_notes(&self, book_id: Option<BookId>) -> Result<Vec<NoteCard>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM note_cards
             WHERE ?1 IS NULL OR book_id = ?1
             ORDER BY updated_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([book_id.map(BookId::get)], NoteRow::read)?;

        let mut notes = Vec::new();
        for row_result in rows {
            notes.push(row_result?.into_note()?);
        }
        Ok(notes)
    }

    fn list_tags(&self, tag_type: Option<TagType>) -> Result<Vec<Tag>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(
            "SELECT id, name, tag_type, category, description, created_at FROM tags
             WHERE ?1 IS NULL OR tag_type = ?1
             ORDER BY category IS NOT NULL, category, name",
        )?;
        let rows = stmt.query_map([tag_type.map(TagType::as_str)], |row| {
            let id: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            let tag_type: String = row.get(2)?;
            let category: Option<String> = row.get(3)?;
            let description: Option<String> = row.get(4)?;
            let created_at: i64 = row.get(5)?;
            Ok((id, name, tag_type, category, description, created_at))
        })?;

        let mut tags = Vec::new();
        for row_result in rows {
            let (id, name, tag_type, category, description, created_at) = row_result?;
            let tag_type: TagType = tag_type
                .parse()
                .with_context(|| format!("corrupt tag row {id}"))?;
            let mut tag = Tag::new(
                TagId::new(id),
                name,
                tag_type,
                category,
                from_millis(created_at)?,
            );
            if let Some(description) = description {
                tag = tag.with_description(description);
            }
            tags.push(tag);
        }
        Ok(tags)
    }
}

/// Current time truncated to the stored millisecond precision, so values
/// returned from writes compare equal to what a later read produces.
fn now_millis() -> Result<OffsetDateTime> {
    from_millis(to_millis(OffsetDateTime::now_utc()))
}

/// Raw `books` row, decoded outside the rusqlite row closure.
struct BookRow {
    id: i64,
    title: String,
    author: Option<String>,
    description: Option<String>,
    domain_tags: String,
    theme_tags: String,
    created_at: i64,
    updated_at: i64,
}

impl BookRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            description: row.get(3)?,
            domain_tags: row.get(4)?,
            theme_tags: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn into_book(self) -> Result<Book> {
        let domain_tags: Vec<String> = serde_json::from_str(&self.domain_tags)
            .with_context(|| format!("corrupt domain_tags on book {}", self.id))?;
        let theme_tags: Vec<String> = serde_json::from_str(&self.theme_tags)
            .with_context(|| format!("corrupt theme_tags on book {}", self.id))?;

        let mut builder = BookBuilder::new()
            .id(BookId::new(self.id))
            .title(self.title)
            .domain_tags(domain_tags)
            .theme_tags(theme_tags)
            .created_at(from_millis(self.created_at)?)
            .updated_at(from_millis(self.updated_at)?);
        if let Some(author) = self.author {
            builder = builder.author(author);
        }
        if let Some(description) = self.description {
            builder = builder.description(description);
        }
        Ok(builder.build())
    }
}

/// Raw `note_cards` row, decoded outside the rusqlite row closure.
struct NoteRow {
    id: i64,
    book_id: i64,
    title: String,
    content: String,
    note_type: Option<String>,
    tags: String,
    page_number: Option<u32>,
    chapter: Option<String>,
    priority: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl NoteRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            book_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            note_type: row.get(4)?,
            tags: row.get(5)?,
            page_number: row.get(6)?,
            chapter: row.get(7)?,
            priority: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_note(self) -> Result<NoteCard> {
        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .with_context(|| format!("corrupt tags on note {}", self.id))?;

        let mut builder = NoteCardBuilder::new()
            .id(NoteId::new(self.id))
            .book_id(BookId::new(self.book_id))
            .title(self.title)
            .content(self.content)
            .tags(tags)
            .created_at(from_millis(self.created_at)?)
            .updated_at(from_millis(self.updated_at)?);
        // Absent or unrecognised values stay absent and resolve to defaults.
        if let Some(note_type) = self.note_type.and_then(|t| t.parse::<NoteType>().ok()) {
            builder = builder.note_type(note_type);
        }
        if let Some(priority) = self.priority.and_then(|p| p.parse::<Priority>().ok()) {
            builder = builder.priority(priority);
        }
        if let Some(page) = self.page_number {
            builder = builder.page_number(page);
        }
        if let Some(chapter) = self.chapter {
            builder = builder.chapter(chapter);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
#[path = "service/tests.rs"]
mod tests;
