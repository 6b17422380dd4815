//! AnkiConnect client.
//!
//! Every operation is a single `{action, params, version}` POST to the
//! configured endpoint. Requests are sent one at a time and never retried.

mod envelope;
#[cfg(test)]
pub(crate) mod fake;

use std::collections::{BTreeMap, HashSet};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub use envelope::{parse_response_body, ApiEnvelope};

use crate::config::AnkiConnectConfig;
use crate::error::{Error, Result};
use crate::models::{NewNote, NoteId};

/// Outcome of [`AnkiClient::create_deck`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedDeck {
    pub id: i64,
    /// `false` when a deck with that name already existed
    pub created: bool,
}

#[derive(Debug, Clone)]
pub struct AnkiClient {
    config: AnkiConnectConfig,
    client: Client,
}

impl AnkiClient {
    pub fn new(config: AnkiConnectConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            config,
            client: builder.build()?,
        })
    }

    pub const fn config(&self) -> &AnkiConnectConfig {
        &self.config
    }

    /// Send an arbitrary action and return its unwrapped `result`.
    ///
    /// `params` must be a JSON object or `null` (sent as `{}`).
    pub async fn send_request(&self, action: &str, params: Value) -> Result<Value> {
        let params = match params {
            Value::Null => Value::Object(serde_json::Map::new()),
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(Error::InvalidInput(format!(
                    "params for `{action}` must be a JSON object, got {other}"
                )))
            }
        };
        let body = json!({
            "action": action,
            "params": params,
            "version": self.config.version,
        });

        tracing::debug!(action, url = %self.config.url, "Sending AnkiConnect request");
        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|error| self.transport_error(error))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| self.transport_error(error))?;
        if !status.is_success() {
            tracing::debug!(action, %status, "AnkiConnect answered with non-success status");
        }

        envelope::parse_response_body(&text)
    }

    async fn request<T: DeserializeOwned>(&self, action: &str, params: Value) -> Result<T> {
        let result = self.send_request(action, params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// API version reported by AnkiConnect; doubles as a connectivity check.
    pub async fn version(&self) -> Result<u32> {
        self.request("version", Value::Null).await
    }

    pub async fn deck_names(&self) -> Result<Vec<String>> {
        self.request("deckNames", Value::Null).await
    }

    /// Create a deck. Existing decks are left untouched.
    pub async fn create_deck(&self, deck_name: &str) -> Result<CreatedDeck> {
        let already_exists = self
            .deck_names()
            .await?
            .iter()
            .any(|name| name == deck_name);
        let id: i64 = self
            .request("createDeck", json!({ "deck": deck_name }))
            .await?;
        if !already_exists {
            tracing::info!("Created deck {}", deck_name);
        }
        Ok(CreatedDeck {
            id,
            created: !already_exists,
        })
    }

    /// Delete a deck together with its cards. Missing decks are ignored.
    pub async fn delete_deck(&self, deck_name: &str) -> Result<()> {
        self.send_request(
            "deleteDecks",
            json!({ "decks": [deck_name], "cardsToo": true }),
        )
        .await?;
        tracing::info!("Deleted deck {}", deck_name);
        Ok(())
    }

    pub async fn add_note(&self, note: &NewNote) -> Result<NoteId> {
        self.request("addNote", json!({ "note": note })).await
    }

    /// Ask Anki whether each note could be added, in order.
    pub async fn can_add_notes(&self, notes: &[NewNote]) -> Result<Vec<bool>> {
        self.request("canAddNotes", json!({ "notes": notes })).await
    }

    /// Add a batch of notes.
    ///
    /// The whole batch is validated with `canAddNotes` first. `canAddNotes`
    /// only compares against notes already in the collection, so notes that
    /// disallow duplicates are also checked against earlier notes of the same
    /// batch. If any note is rejected, [`Error::InvalidBatch`] is returned and
    /// nothing is added.
    pub async fn add_notes(&self, notes: &[NewNote]) -> Result<Vec<NoteId>> {
        if notes.is_empty() {
            return Ok(Vec::new());
        }

        let verdicts = self.can_add_notes(notes).await?;
        if verdicts.len() != notes.len() {
            return Err(Error::MalformedResponse(format!(
                "canAddNotes returned {} results for {} notes",
                verdicts.len(),
                notes.len()
            )));
        }
        let mut rejected = rejected_indices(&verdicts);
        if notes.iter().any(|note| !note.options.allow_duplicate) {
            let first_fields = self.first_fields(notes).await?;
            rejected.extend(repeated_in_batch(notes, &first_fields));
            rejected.sort_unstable();
            rejected.dedup();
        }
        if !rejected.is_empty() {
            tracing::warn!(
                "Rejected batch of {} notes: {} invalid",
                notes.len(),
                rejected.len()
            );
            return Err(Error::InvalidBatch { rejected });
        }

        tracing::info!("Adding {} notes...", notes.len());
        let mut ids = Vec::with_capacity(notes.len());
        for note in notes {
            ids.push(self.add_note(note).await?);
        }
        Ok(ids)
    }

    /// First field of every note type used by a note that disallows
    /// duplicates. Unknown note types map to `None`; `canAddNotes` already
    /// rejects them.
    async fn first_fields(&self, notes: &[NewNote]) -> Result<BTreeMap<String, Option<String>>> {
        let mut first_fields = BTreeMap::new();
        for note in notes.iter().filter(|note| !note.options.allow_duplicate) {
            if first_fields.contains_key(&note.model_name) {
                continue;
            }
            let first = match self.model_field_names(&note.model_name).await {
                Ok(fields) => fields.into_iter().next(),
                Err(Error::Api(_)) => None,
                Err(error) => return Err(error),
            };
            first_fields.insert(note.model_name.clone(), first);
        }
        Ok(first_fields)
    }

    pub async fn model_names(&self) -> Result<Vec<String>> {
        self.request("modelNames", Value::Null).await
    }

    pub async fn model_field_names(&self, model_name: &str) -> Result<Vec<String>> {
        self.request("modelFieldNames", json!({ "modelName": model_name }))
            .await
    }

    /// Note ids matching an Anki search query, e.g. one built by [`deck_query`].
    pub async fn find_notes(&self, query: &str) -> Result<Vec<NoteId>> {
        self.request("findNotes", json!({ "query": query })).await
    }

    pub async fn delete_notes(&self, note_ids: &[NoteId]) -> Result<()> {
        self.send_request("deleteNotes", json!({ "notes": note_ids }))
            .await?;
        Ok(())
    }

    fn transport_error(&self, error: reqwest::Error) -> Error {
        if error.is_connect() {
            Error::AnkiUnavailable {
                url: self.config.url.clone(),
                source: error,
            }
        } else {
            Error::Http(error)
        }
    }
}

/// Build the search query that matches the notes of exactly one deck.
///
/// Subdecks are excluded and Anki's `_`/`*` wildcards are escaped.
pub fn deck_query(deck_name: &str) -> String {
    let escaped = escape_search_text(deck_name);
    format!("deck:\"{escaped}\" -deck:\"{escaped}::*\"")
}

fn escape_search_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '"' | '*' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Indices of notes that disallow duplicates and repeat the first field of an
/// earlier note of the same note type in the batch.
///
/// Anki's default duplicate scope is the whole collection, so the deck is not
/// part of the key.
fn repeated_in_batch(
    notes: &[NewNote],
    first_fields: &BTreeMap<String, Option<String>>,
) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for (index, note) in notes.iter().enumerate() {
        let Some(Some(first_field)) = first_fields.get(&note.model_name) else {
            continue;
        };
        let Some(value) = note.field(first_field) else {
            continue;
        };
        let is_new = seen.insert((note.model_name.as_str(), value.trim()));
        if !is_new && !note.options.allow_duplicate {
            repeated.push(index);
        }
    }
    repeated
}

fn rejected_indices(verdicts: &[bool]) -> Vec<usize> {
    verdicts
        .iter()
        .enumerate()
        .filter_map(|(index, ok)| (!ok).then_some(index))
        .collect()
}
