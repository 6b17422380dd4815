use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vocab2anki_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("No {0} given (input closed)")]
    MissingInput(&'static str),
    #[error("Invalid --params: {0}")]
    InvalidParams(String),
}

impl CliError {
    /// Extra guidance for errors the user can fix outside this tool.
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Core(vocab2anki_core::Error::AnkiUnavailable { .. }) => Some(
                "Please make sure you have Anki opened and the AnkiConnect addon installed.",
            ),
            Self::Core(vocab2anki_core::Error::VocabUnavailable { .. }) => {
                Some("Make sure your Kindle is connected, or pass --db-path.")
            }
            _ => None,
        }
    }
}
