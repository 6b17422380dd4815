use std::path::PathBuf;

use crate::commands::common::{
    format_word_lines, load_config, open_client, print_names, read_unmastered_words,
};
use crate::error::CliError;

pub async fn run_decks(as_json: bool, anki_url: Option<String>) -> Result<(), CliError> {
    let client = open_client(&load_config()?, anki_url)?;
    print_names(&client.deck_names().await?, as_json)
}

pub async fn run_note_types(as_json: bool, anki_url: Option<String>) -> Result<(), CliError> {
    let client = open_client(&load_config()?, anki_url)?;
    print_names(&client.model_names().await?, as_json)
}

pub async fn run_fields(
    note_type: &str,
    as_json: bool,
    anki_url: Option<String>,
) -> Result<(), CliError> {
    let client = open_client(&load_config()?, anki_url)?;
    print_names(&client.model_field_names(note_type).await?, as_json)
}

pub fn run_words(
    limit: Option<usize>,
    as_json: bool,
    db_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config()?;
    let mut words = read_unmastered_words(&config.resolve_vocab_db_path(db_path))?;
    if let Some(limit) = limit {
        words.truncate(limit);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&words)?);
    } else {
        for line in format_word_lines(&words) {
            println!("{line}");
        }
    }
    Ok(())
}
