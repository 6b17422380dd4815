//! Turning Vocabulary Builder lookups into Anki notes.

use serde::Serialize;

use crate::anki::AnkiClient;
use crate::error::{Error, Result};
use crate::models::{FieldMapping, NewNote, NoteId, WordRecord};
use crate::util::split_tags;

/// Tag attached to every imported note.
pub const AUTO_GENERATED_TAG: &str = "auto-generated";

/// Where and how imported words land in Anki
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub deck: String,
    pub note_type: String,
    pub mapping: FieldMapping,
    pub tags: Vec<String>,
    pub allow_duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub deck: String,
    /// Whether the deck had to be created for this import
    pub created_deck: bool,
    pub added: Vec<NoteId>,
}

impl ImportPlan {
    pub fn new(
        deck: impl Into<String>,
        note_type: impl Into<String>,
        mapping: FieldMapping,
    ) -> Result<Self> {
        let deck = deck.into().trim().to_string();
        let note_type = note_type.into().trim().to_string();
        if deck.is_empty() {
            return Err(Error::InvalidInput("Deck name must not be empty".to_string()));
        }
        if note_type.is_empty() {
            return Err(Error::InvalidInput("Note type must not be empty".to_string()));
        }
        Ok(Self {
            deck,
            note_type,
            mapping,
            tags: normalize_tags::<&str>(&[]),
            allow_duplicate: true,
        })
    }

    /// Replace the tag list. Each entry may hold several space-separated tags.
    #[must_use]
    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = normalize_tags(tags);
        self
    }

    #[must_use]
    pub const fn allow_duplicate(mut self, allow: bool) -> Self {
        self.allow_duplicate = allow;
        self
    }

    /// One note per word, in the same order.
    pub fn build_notes(&self, words: &[WordRecord]) -> Vec<NewNote> {
        words
            .iter()
            .map(|word| {
                NewNote::new(
                    self.deck.clone(),
                    self.note_type.clone(),
                    self.mapping.fields_for(word),
                )
                .with_tags(self.tags.clone())
                .allow_duplicate(self.allow_duplicate)
            })
            .collect()
    }

    /// Check that the note type exists and has both mapped fields.
    pub async fn validate_mapping(&self, client: &AnkiClient) -> Result<()> {
        let models = client.model_names().await?;
        if !models.iter().any(|model| model == &self.note_type) {
            return Err(Error::InvalidInput(format!(
                "Note type '{}' does not exist (available: {})",
                self.note_type,
                models.join(", ")
            )));
        }

        let fields = client.model_field_names(&self.note_type).await?;
        for field in [&self.mapping.word_field, &self.mapping.usage_field] {
            if !fields.iter().any(|name| name.eq_ignore_ascii_case(field)) {
                return Err(Error::InvalidInput(format!(
                    "Note type '{}' has no field '{}' (available: {})",
                    self.note_type,
                    field,
                    fields.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Create the deck if needed and add every word as one validated batch.
    pub async fn run(&self, client: &AnkiClient, words: &[WordRecord]) -> Result<ImportReport> {
        if words.is_empty() {
            tracing::info!("No unmastered words to import");
            return Ok(ImportReport {
                deck: self.deck.clone(),
                created_deck: false,
                added: Vec::new(),
            });
        }

        let deck = client.create_deck(&self.deck).await?;
        let notes = self.build_notes(words);
        let added = client.add_notes(&notes).await?;
        tracing::debug!("Added {} notes to {}", added.len(), self.deck);

        Ok(ImportReport {
            deck: self.deck.clone(),
            created_deck: deck.created,
            added,
        })
    }
}

/// Split, dedupe, and append the auto-generated marker tag.
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let joined = raw
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let mut tags = split_tags(&joined);
    if !tags.iter().any(|tag| tag == AUTO_GENERATED_TAG) {
        tags.push(AUTO_GENERATED_TAG.to_string());
    }
    tags
}
