//! Error types for vocab2anki-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using vocab2anki-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vocab2anki-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// AnkiConnect answered with something other than a `{result, error}` envelope
    #[error("Malformed AnkiConnect response: {0}")]
    MalformedResponse(String),

    /// AnkiConnect reported an error for the request
    #[error("AnkiConnect error: {0}")]
    Api(String),

    /// The AnkiConnect endpoint could not be reached
    #[error("Couldn't connect to Anki at {url}: {source}")]
    AnkiUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The vocabulary database could not be opened
    #[error("Couldn't open vocabulary database at {}: {source}", .path.display())]
    VocabUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// HTTP error other than an unreachable endpoint
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// One or more notes of a batch failed validation; nothing was added
    #[error("Fields have to be valid for all cards (rejected notes: {})", format_indices(.rejected))]
    InvalidBatch { rejected: Vec<usize> },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Whether the error means one of the two external systems is not reachable.
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::AnkiUnavailable { .. } | Self::VocabUnavailable { .. }
        )
    }
}

fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
