mod schema;

use std::path::Path;

use anyhow::Result;
use log::info;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::TagType;
use crate::taxonomy::taxonomy;
use schema::INITIAL_SCHEMA;

/// Database wrapper providing connection management and schema initialization.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema and seeds the tag taxonomy.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically initializes the schema and seeds the tag taxonomy.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Uses IF NOT EXISTS for idempotent execution. Foreign keys must be on
    /// for note cards to follow their book on delete.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        self.conn.execute_batch(INITIAL_SCHEMA)?;
        self.seed_taxonomy()?;
        Ok(())
    }

    /// Inserts the static taxonomy when the tags table is empty.
    ///
    /// Existing tag rows are never touched, so reopening is idempotent and
    /// user-edited tags survive.
    fn seed_taxonomy(&self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let now = to_millis(OffsetDateTime::now_utc());
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tags (name, tag_type, category, created_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for tag_type in [TagType::Domain, TagType::Theme] {
                for (category, leaves) in taxonomy(tag_type) {
                    stmt.execute((category, tag_type.as_str(), None::<&str>, now))?;
                    inserted += 1;
                    for leaf in *leaves {
                        stmt.execute((leaf, tag_type.as_str(), Some(category), now))?;
                        inserted += 1;
                    }
                }
            }
        }
        tx.commit()?;

        info!("event=taxonomy_seeded module=db tags={inserted}");
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    ///
    /// Useful for executing custom queries in tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Converts a timestamp to the stored Unix-millisecond representation.
pub(crate) fn to_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Converts a stored Unix-millisecond value back into a UTC timestamp.
pub(crate) fn from_millis(millis: i64) -> Result<OffsetDateTime> {
    Ok(OffsetDateTime::from_unix_timestamp_nanos(
        i128::from(millis) * 1_000_000,
    )?)
}
