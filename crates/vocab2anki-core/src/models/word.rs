//! Vocabulary Builder word model

use serde::{Deserialize, Serialize};

/// One dictionary lookup of a word that has not been mastered yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Dictionary base form (stem) of the looked-up word
    pub word: String,
    /// Sentence the word was looked up in
    pub usage: String,
}

impl WordRecord {
    #[must_use]
    pub fn new(word: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            usage: usage.into(),
        }
    }
}
