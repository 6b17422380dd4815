//! In-process stand-in for AnkiConnect used by the tests.
//!
//! Implements the handful of actions the client uses with Anki's validation
//! rules: unknown deck or model, unknown field, empty first field, and
//! duplicate first field when duplicates are disallowed.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::config::AnkiConnectConfig;
use crate::AnkiClient;

#[derive(Debug, Clone)]
pub struct StoredNote {
    pub id: i64,
    pub deck: String,
    pub fields: BTreeMap<String, String>,
    pub tags: Vec<String>,
}

#[derive(Debug)]
pub struct FakeAnki {
    pub decks: Vec<String>,
    pub models: BTreeMap<String, Vec<String>>,
    pub notes: Vec<StoredNote>,
    /// Every action received, in order
    pub actions: Vec<String>,
    next_id: i64,
}

impl Default for FakeAnki {
    fn default() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            "Basic".to_string(),
            vec!["Front".to_string(), "Back".to_string()],
        );
        models.insert(
            "Vocabulary".to_string(),
            vec![
                "Word".to_string(),
                "Context".to_string(),
                "Notes".to_string(),
            ],
        );
        Self {
            decks: vec!["Default".to_string()],
            models,
            notes: Vec::new(),
            actions: Vec::new(),
            next_id: 1_700_000_000_000,
        }
    }
}

pub type SharedFake = Arc<Mutex<FakeAnki>>;

impl FakeAnki {
    pub fn notes_in_deck(&self, deck: &str) -> usize {
        self.notes.iter().filter(|note| note.deck == deck).count()
    }

    pub fn count_action(&self, action: &str) -> usize {
        self.actions.iter().filter(|seen| *seen == action).count()
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn dispatch(&mut self, action: &str, params: &Value) -> Result<Value, String> {
        match action {
            "version" => Ok(json!(6)),
            "deckNames" => Ok(json!(self.decks)),
            "createDeck" => {
                let deck = required_str(action, params, "deck")?;
                if let Some(index) = self.decks.iter().position(|name| name == deck) {
                    return Ok(json!(deck_id(index)));
                }
                self.decks.push(deck.to_string());
                Ok(json!(deck_id(self.decks.len() - 1)))
            }
            "deleteDecks" => {
                let decks = required(action, params, "decks")?;
                if params.get("cardsToo").and_then(Value::as_bool) != Some(true) {
                    return Err("Since Anki 2.1.28 it's not possible to delete decks without deleting cards as well".to_string());
                }
                let names: Vec<String> = serde_json::from_value(decks.clone())
                    .map_err(|error| error.to_string())?;
                self.decks.retain(|deck| !names.contains(deck));
                self.notes.retain(|note| !names.contains(&note.deck));
                Ok(Value::Null)
            }
            "addNote" => {
                let note = required(action, params, "note")?;
                self.validate_note(note)?;
                let id = self.next_id();
                self.notes.push(StoredNote {
                    id,
                    deck: note["deckName"].as_str().unwrap_or_default().to_string(),
                    fields: serde_json::from_value(note["fields"].clone()).unwrap_or_default(),
                    tags: serde_json::from_value(note["tags"].clone()).unwrap_or_default(),
                });
                Ok(json!(id))
            }
            "canAddNotes" => {
                let notes = required(action, params, "notes")?
                    .as_array()
                    .ok_or("notes must be a list")?;
                let verdicts: Vec<bool> = notes
                    .iter()
                    .map(|note| self.validate_note(note).is_ok())
                    .collect();
                Ok(json!(verdicts))
            }
            "modelNames" => Ok(json!(self.models.keys().collect::<Vec<_>>())),
            "modelFieldNames" => {
                let model = required_str(action, params, "modelName")?;
                self.models
                    .get(model)
                    .map(|fields| json!(fields))
                    .ok_or_else(|| format!("model was not found: {model}"))
            }
            "findNotes" => {
                let query = required_str(action, params, "query")?;
                let deck = quoted_deck(query)
                    .ok_or_else(|| format!("unsupported query: {query}"))?;
                let ids: Vec<i64> = self
                    .notes
                    .iter()
                    .filter(|note| note.deck == deck)
                    .map(|note| note.id)
                    .collect();
                Ok(json!(ids))
            }
            "deleteNotes" => {
                let ids: Vec<i64> = serde_json::from_value(required(action, params, "notes")?.clone())
                    .map_err(|error| error.to_string())?;
                self.notes.retain(|note| !ids.contains(&note.id));
                Ok(Value::Null)
            }
            "getDeckConfig" => {
                let deck = required_str(action, params, "deck")?;
                if self.decks.iter().any(|name| name == deck) {
                    Ok(json!({ "name": "Default", "id": 1 }))
                } else {
                    Ok(json!(false))
                }
            }
            _ => Err("unsupported action".to_string()),
        }
    }

    fn validate_note(&self, note: &Value) -> Result<(), String> {
        let deck = note["deckName"].as_str().unwrap_or_default();
        let model = note["modelName"].as_str().unwrap_or_default();
        if !self.decks.iter().any(|name| name == deck) {
            return Err(format!("deck was not found: {deck}"));
        }
        let Some(model_fields) = self.models.get(model) else {
            return Err(format!("model was not found: {model}"));
        };
        let fields: BTreeMap<String, String> =
            serde_json::from_value(note["fields"].clone()).map_err(|error| error.to_string())?;
        if let Some(unknown) = fields.keys().find(|name| {
            !model_fields
                .iter()
                .any(|field| field.eq_ignore_ascii_case(name))
        }) {
            return Err(format!("'{unknown}' is not a field of {model}"));
        }
        let first_field = &model_fields[0];
        let first_value = field_value(&fields, first_field).unwrap_or_default();
        if first_value.trim().is_empty() {
            return Err("cannot create note because it is empty".to_string());
        }
        let allow_duplicate = note["options"]["allowDuplicate"]
            .as_bool()
            .unwrap_or(false);
        let duplicate = self.notes.iter().any(|existing| {
            existing.deck == deck
                && field_value(&existing.fields, first_field) == Some(first_value)
        });
        if duplicate && !allow_duplicate {
            return Err("cannot create note because it is a duplicate".to_string());
        }
        Ok(())
    }
}

fn field_value<'a>(fields: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Deck name from the leading `deck:"..."` term of a query, unescaped.
fn quoted_deck(query: &str) -> Option<String> {
    let mut chars = query.strip_prefix("deck:\"")?.chars();
    let mut deck = String::new();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => deck.push(chars.next()?),
            '"' => return Some(deck),
            _ => deck.push(ch),
        }
    }
    None
}

fn deck_id(index: usize) -> i64 {
    1_000 + i64::try_from(index).unwrap_or_default()
}

fn required<'a>(action: &str, params: &'a Value, name: &str) -> Result<&'a Value, String> {
    params
        .get(name)
        .ok_or_else(|| format!("{action}() missing 1 required positional argument: '{name}'"))
}

fn required_str<'a>(action: &str, params: &'a Value, name: &str) -> Result<&'a str, String> {
    required(action, params, name)?
        .as_str()
        .ok_or_else(|| format!("{name} must be a string"))
}

async fn handle(State(state): State<SharedFake>, Json(body): Json<Value>) -> Json<Value> {
    let action = body["action"].as_str().unwrap_or_default().to_string();
    let params = body.get("params").cloned().unwrap_or_else(|| json!({}));

    let mut fake = state.lock().unwrap();
    fake.actions.push(action.clone());

    // Envelope violations on demand, for the client's contract checks.
    match action.as_str() {
        "fakeExtraField" => return Json(json!({ "result": 1, "error": null, "extra": true })),
        "fakeMissingError" => return Json(json!({ "result": 1 })),
        _ => {}
    }

    match fake.dispatch(&action, &params) {
        Ok(result) => Json(json!({ "result": result, "error": null })),
        Err(error) => Json(json!({ "result": null, "error": error })),
    }
}

/// Start a fake AnkiConnect on an ephemeral port and return a client for it.
pub async fn spawn() -> (AnkiClient, SharedFake) {
    let state: SharedFake = Arc::new(Mutex::new(FakeAnki::default()));
    let app = Router::new()
        .route("/", post(handle))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = AnkiConnectConfig::new(format!("http://{addr}")).unwrap();
    (AnkiClient::new(config).unwrap(), state)
}
