//! Data models for vocab2anki

mod mapping;
mod note;
mod word;

pub use mapping::FieldMapping;
pub use note::{NewNote, NoteId, NoteOptions};
pub use word::WordRecord;
