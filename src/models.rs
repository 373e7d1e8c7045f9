mod book;
mod ids;
mod note_card;
mod note_type;
mod tag;

pub use book::{Book, BookBuilder, BookPatch, NewBook};
pub use ids::{BookId, NoteId, TagId};
pub use note_card::{
    NewNoteCard, NoteCard, NoteCardBuilder, NoteCardPatch, resolve_note_type, resolve_priority,
};
pub use note_type::{NoteType, Priority};
pub use tag::{Tag, TagType};
