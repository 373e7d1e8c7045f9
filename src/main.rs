use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use shelf::logging::init_logging;
use shelf::utils::{ensure_database_directory, parse_list, parse_tags};
use shelf::{
    BookId, BookPatch, Config, Database, EntityStore, KnowledgeEngine, LibraryError,
    LibraryService, NewBook, NewNoteCard, NoteCardPatch, NoteId, NoteType, ParseValueError,
    Priority, QuerySpec, SearchField, SortKey, SortOrder, TagType,
};
use time::Date;
use time::macros::format_description;

/// shelf - personal reading knowledge base
#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Books, note cards and the relations between them")]
#[command(version)]
struct Cli {
    /// Database file (overrides SHELF_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace (overrides SHELF_LOG_LEVEL)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Manage books
    #[command(subcommand)]
    Book(BookCommand),
    /// Manage note cards
    #[command(subcommand)]
    Note(NoteCommand),
    /// List taxonomy tags
    Tags {
        /// Only list one dimension
        #[arg(long = "type", value_name = "TYPE")]
        tag_type: Option<TagType>,
    },
    /// Search books and notes
    Search(SearchCommand),
    /// Print the book relation graph
    Graph,
    /// Print reading statistics
    Stats,
}

#[derive(Subcommand)]
enum BookCommand {
    /// Add a book
    Add {
        #[arg(value_name = "TITLE")]
        title: String,
        #[command(flatten)]
        fields: BookFields,
    },
    /// List all books
    List,
    /// Show a book with its notes
    Show { id: i64 },
    /// Update fields of a book
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: BookFields,
    },
    /// Delete a book and its notes
    Delete { id: i64 },
}

#[derive(Args)]
struct BookFields {
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Comma-separated domain tags
    #[arg(long, value_name = "TAGS")]
    domain: Option<String>,
    /// Comma-separated theme tags
    #[arg(long, value_name = "TAGS")]
    theme: Option<String>,
}

#[derive(Subcommand)]
enum NoteCommand {
    /// Add a note card to a book
    Add {
        book_id: i64,
        #[arg(value_name = "TITLE")]
        title: String,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// List note cards
    List {
        /// Only notes of this book
        #[arg(long, value_name = "ID")]
        book: Option<i64>,
    },
    /// Update fields of a note card
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Delete a note card
    Delete { id: i64 },
}

#[derive(Args)]
struct NoteFields {
    #[arg(long)]
    content: Option<String>,
    /// concept, quote, reflection, application or summary
    #[arg(long = "type", value_name = "TYPE")]
    note_type: Option<NoteType>,
    /// Comma-separated free-form tags
    #[arg(long, value_name = "TAGS")]
    tags: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    chapter: Option<String>,
    /// low, medium or high
    #[arg(long)]
    priority: Option<Priority>,
}

#[derive(Args)]
struct SearchCommand {
    /// Case-insensitive substring to look for
    #[arg(value_name = "QUERY", default_value = "")]
    query: String,
    /// Fields to search: title,author,description,notes
    #[arg(long = "in", value_name = "FIELDS")]
    search_in: Option<String>,
    #[arg(long, value_name = "TAGS")]
    domain: Option<String>,
    #[arg(long, value_name = "TAGS")]
    theme: Option<String>,
    #[arg(long, value_name = "TYPES")]
    note_types: Option<String>,
    #[arg(long, value_name = "PRIORITIES")]
    priorities: Option<String>,
    /// Earliest creation date, YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    from: Option<String>,
    /// Latest creation date, YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    to: Option<String>,
    /// relevance, createdAt, updatedAt or title
    #[arg(long, value_name = "KEY")]
    sort: Option<SortKey>,
    #[arg(long, value_name = "ORDER")]
    order: Option<SortOrder>,
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long)]
    offset: Option<usize>,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Validation and parse failures are the user's to fix; everything else
/// (database, I/O) is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<LibraryError>().is_some()
        || error.downcast_ref::<ParseValueError>().is_some()
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    let _logger = init_logging(&config.log_level, config.log_dir.as_deref())?;

    ensure_database_directory(&config.db_path)?;
    let db = Database::open(&config.db_path).context("Failed to open database")?;

    let output = execute(cli.command, &LibraryService::new(db))?;
    println!("{output}");
    Ok(())
}

/// Runs one command and renders its result as pretty JSON.
///
/// Separated from `run` so it can be exercised against in-memory databases.
fn execute(command: Commands, service: &LibraryService) -> Result<String> {
    match command {
        Commands::Book(cmd) => execute_book(cmd, service),
        Commands::Note(cmd) => execute_note(cmd, service),
        Commands::Tags { tag_type } => to_json(&service.list_tags(tag_type)?),
        Commands::Search(cmd) => {
            let spec = build_query(cmd)?;
            to_json(&KnowledgeEngine::new(service).search(&spec)?)
        }
        Commands::Graph => to_json(&KnowledgeEngine::new(service).build_relation_graph()?),
        Commands::Stats => to_json(&KnowledgeEngine::new(service).compute_stats()?),
    }
}

fn execute_book(cmd: BookCommand, service: &LibraryService) -> Result<String> {
    match cmd {
        BookCommand::Add { title, fields } => {
            let book = service.create_book(&NewBook {
                title,
                author: fields.author,
                description: fields.description,
                domain_tags: fields.domain.as_deref().map(parse_tags).unwrap_or_default(),
                theme_tags: fields.theme.as_deref().map(parse_tags).unwrap_or_default(),
            })?;
            to_json(&book)
        }
        BookCommand::List => to_json(&service.list_books()?),
        BookCommand::Show { id } => {
            let id = BookId::new(id);
            let book = service
                .get_book(id)?
                .ok_or(LibraryError::BookNotFound(id))?;
            let notes = service.list_notes(Some(id))?;
            to_json(&serde_json::json!({ "book": book, "notes": notes }))
        }
        BookCommand::Update { id, title, fields } => {
            let id = BookId::new(id);
            let patch = BookPatch {
                title,
                author: fields.author,
                description: fields.description,
                domain_tags: fields.domain.as_deref().map(parse_tags),
                theme_tags: fields.theme.as_deref().map(parse_tags),
            };
            let book = service
                .update_book(id, &patch)?
                .ok_or(LibraryError::BookNotFound(id))?;
            to_json(&book)
        }
        BookCommand::Delete { id } => {
            let id = BookId::new(id);
            if !service.delete_book(id)? {
                return Err(LibraryError::BookNotFound(id).into());
            }
            to_json(&serde_json::json!({ "deleted": id }))
        }
    }
}

fn execute_note(cmd: NoteCommand, service: &LibraryService) -> Result<String> {
    match cmd {
        NoteCommand::Add {
            book_id,
            title,
            fields,
        } => {
            let note = service.create_note(&NewNoteCard {
                book_id: BookId::new(book_id),
                title,
                content: fields.content.unwrap_or_default(),
                note_type: fields.note_type,
                tags: fields.tags.as_deref().map(parse_tags).unwrap_or_default(),
                page_number: fields.page,
                chapter: fields.chapter,
                priority: fields.priority,
            })?;
            to_json(&note)
        }
        NoteCommand::List { book } => to_json(&service.list_notes(book.map(BookId::new))?),
        NoteCommand::Update { id, title, fields } => {
            let id = NoteId::new(id);
            let patch = NoteCardPatch {
                title,
                content: fields.content,
                note_type: fields.note_type,
                tags: fields.tags.as_deref().map(parse_tags),
                page_number: fields.page,
                chapter: fields.chapter,
                priority: fields.priority,
            };
            let note = service
                .update_note(id, &patch)?
                .ok_or(LibraryError::NoteNotFound(id))?;
            to_json(&note)
        }
        NoteCommand::Delete { id } => {
            let id = NoteId::new(id);
            if !service.delete_note(id)? {
                return Err(LibraryError::NoteNotFound(id).into());
            }
            to_json(&serde_json::json!({ "deleted": id }))
        }
    }
}

/// Turns raw search arguments into a typed query. Omitted lists keep the
/// query defaults.
fn build_query(cmd: SearchCommand) -> Result<QuerySpec> {
    let mut spec = QuerySpec {
        query: cmd.query,
        sort_by: cmd.sort.unwrap_or_default(),
        sort_order: cmd.order.unwrap_or_default(),
        limit: cmd.limit,
        offset: cmd.offset,
        ..Default::default()
    };

    if let Some(fields) = cmd.search_in.as_deref() {
        let fields: Vec<SearchField> = parse_list(fields)?;
        if !fields.is_empty() {
            spec.search_in = fields;
        }
    }
    spec.domain_tags = cmd.domain.as_deref().map(parse_tags).unwrap_or_default();
    spec.theme_tags = cmd.theme.as_deref().map(parse_tags).unwrap_or_default();
    if let Some(types) = cmd.note_types.as_deref() {
        spec.note_types = parse_list(types)?;
    }
    if let Some(priorities) = cmd.priorities.as_deref() {
        spec.priorities = parse_list(priorities)?;
    }
    spec.date_from = cmd.from.as_deref().map(parse_date).transpose()?;
    spec.date_to = cmd.to.as_deref().map(parse_date).transpose()?;

    Ok(spec)
}

fn parse_date(input: &str) -> Result<Date, ParseValueError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ParseValueError {
            kind: "date",
            value: input.to_string(),
        }
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to render output")
}
