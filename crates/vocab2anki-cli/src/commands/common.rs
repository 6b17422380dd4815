use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Serialize;
use vocab2anki_core::{AnkiClient, NewNote, VocabDatabase, WordRecord};

use crate::cli_config::CliConfig;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct NotePreviewItem {
    pub deck: String,
    pub note_type: String,
    pub fields: Vec<(String, String)>,
    pub tags: Vec<String>,
}

pub fn load_config() -> Result<CliConfig, CliError> {
    CliConfig::load().map_err(CliError::Config)
}

pub fn open_client(config: &CliConfig, anki_url: Option<String>) -> Result<AnkiClient, CliError> {
    let anki_config = config
        .resolve_anki_config(anki_url)
        .map_err(CliError::Config)?;
    tracing::debug!("Using AnkiConnect at {}", anki_config.url);
    Ok(AnkiClient::new(anki_config)?)
}

pub fn read_unmastered_words(db_path: &Path) -> Result<Vec<WordRecord>, CliError> {
    let db = VocabDatabase::open(db_path)?;
    Ok(db.unmastered_words()?)
}

/// Print `label: ` and read one trimmed line.
///
/// Returns `None` once the input is closed.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<Option<String>, CliError> {
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Keep asking until a non-empty answer is given.
pub fn prompt_required<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    what: &'static str,
) -> Result<String, CliError> {
    loop {
        match prompt_line(input, output, label)? {
            None => return Err(CliError::MissingInput(what)),
            Some(answer) if answer.is_empty() => {}
            Some(answer) => return Ok(answer),
        }
    }
}

pub fn print_available<W: Write>(output: &mut W, label: &str, items: &[String]) -> io::Result<()> {
    writeln!(output, "Available {label}: {}", items.join(", "))
}

pub fn print_names(names: &[String], as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

pub fn format_word_lines(words: &[WordRecord]) -> Vec<String> {
    let width = words
        .iter()
        .map(|word| word.word.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    words
        .iter()
        .map(|word| {
            let usage = collapse_whitespace(&word.usage);
            if usage.is_empty() {
                word.word.clone()
            } else {
                format!("{:<width$}  {}", word.word, truncate(&usage, 80))
            }
        })
        .collect()
}

pub fn note_to_preview_item(note: &NewNote) -> NotePreviewItem {
    NotePreviewItem {
        deck: note.deck_name.clone(),
        note_type: note.model_name.clone(),
        fields: note
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        tags: note.tags.clone(),
    }
}

pub fn format_note_preview(note: &NewNote) -> String {
    let fields = note
        .fields
        .iter()
        .map(|(name, value)| format!("{name}={}", truncate(&collapse_whitespace(value), 40)))
        .collect::<Vec<_>>()
        .join("  ");
    let tags = note
        .tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{fields}  {tags}")
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
