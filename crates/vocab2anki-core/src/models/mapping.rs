//! Mapping from word records to note type fields

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::WordRecord;
use crate::error::{Error, Result};

/// Which note type field receives the word and which receives its usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub word_field: String,
    pub usage_field: String,
}

impl FieldMapping {
    /// Create a mapping, rejecting blank field names
    pub fn new(word_field: impl Into<String>, usage_field: impl Into<String>) -> Result<Self> {
        let word_field = word_field.into().trim().to_string();
        let usage_field = usage_field.into().trim().to_string();
        if word_field.is_empty() {
            return Err(Error::InvalidInput(
                "Word field name must not be empty".to_string(),
            ));
        }
        if usage_field.is_empty() {
            return Err(Error::InvalidInput(
                "Usage field name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            word_field,
            usage_field,
        })
    }

    /// Build the field dictionary for one word.
    ///
    /// Anki matches field names case-insensitively. When both names refer to
    /// the same field, the word is kept.
    pub fn fields_for(&self, word: &WordRecord) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert(self.word_field.clone(), word.word.clone());
        if !self.shares_field() {
            fields.insert(self.usage_field.clone(), word.usage.clone());
        }
        fields
    }

    /// Whether word and usage go to the same field.
    pub fn shares_field(&self) -> bool {
        self.word_field.eq_ignore_ascii_case(&self.usage_field)
    }
}
