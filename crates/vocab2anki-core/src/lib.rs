//! vocab2anki-core - Core library for vocab2anki
//!
//! This crate contains the AnkiConnect client, the Kindle Vocabulary Builder
//! reader, and the import logic that turns looked-up words into Anki notes.

pub mod anki;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod util;
pub mod vocab;

pub use anki::AnkiClient;
pub use config::AnkiConnectConfig;
pub use error::{Error, Result};
pub use models::{FieldMapping, NewNote, NoteId, WordRecord};
pub use vocab::VocabDatabase;
