//! Note model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier Anki assigns to a note when it is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A note about to be submitted to Anki
///
/// Serializes to the shape AnkiConnect expects for `addNote` and
/// `canAddNotes`: `{deckName, modelName, fields, tags, options}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    /// Target deck
    pub deck_name: String,
    /// Note type (model) name
    pub model_name: String,
    /// Field name -> value
    pub fields: BTreeMap<String, String>,
    /// Tags attached to the note
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub options: NoteOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    pub allow_duplicate: bool,
}

impl Default for NoteOptions {
    fn default() -> Self {
        Self {
            allow_duplicate: true,
        }
    }
}

impl NewNote {
    /// Create a note with no tags that allows duplicates
    #[must_use]
    pub fn new(
        deck_name: impl Into<String>,
        model_name: impl Into<String>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            deck_name: deck_name.into(),
            model_name: model_name.into(),
            fields,
            tags: Vec::new(),
            options: NoteOptions::default(),
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub const fn allow_duplicate(mut self, allow: bool) -> Self {
        self.options.allow_duplicate = allow;
        self
    }

    /// Add or replace a single field value
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Value of a field, matching the name case-insensitively as Anki does.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
