/// Complete database schema for the library.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// Tag lists are JSON arrays so their display order survives a round trip.
/// Timestamps are Unix milliseconds.
pub const INITIAL_SCHEMA: &str = r#"
-- Books table: catalogued books with their two tag dimensions
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    author TEXT,
    description TEXT,
    domain_tags TEXT NOT NULL DEFAULT '[]',
    theme_tags TEXT NOT NULL DEFAULT '[]',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Note cards table: notes attached to a book, removed with it
CREATE TABLE IF NOT EXISTS note_cards (
    id INTEGER PRIMARY KEY,
    book_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT '',
    note_type TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    page_number INTEGER,
    chapter TEXT,
    priority TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
);

-- Tags table: two-level taxonomy, category is NULL for top-level entries
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    tag_type TEXT NOT NULL CHECK (tag_type IN ('domain', 'theme')),
    category TEXT,
    description TEXT,
    created_at INTEGER NOT NULL,
    UNIQUE (tag_type, name)
);

-- Storage order for listings
CREATE INDEX IF NOT EXISTS idx_books_updated ON books(updated_at);
CREATE INDEX IF NOT EXISTS idx_note_cards_updated ON note_cards(updated_at);

-- Cascade and per-book lookups
CREATE INDEX IF NOT EXISTS idx_note_cards_book ON note_cards(book_id);
"#;
