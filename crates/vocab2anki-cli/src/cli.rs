use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "vocab2anki")]
#[command(about = "Import Kindle Vocabulary Builder words into Anki")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the Kindle vocabulary database (vocab.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// AnkiConnect endpoint (default: http://localhost:8765)
    #[arg(long, global = true, value_name = "URL")]
    pub anki_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add unmastered words to an Anki deck (default command)
    Import(ImportArgs),
    /// List Anki decks
    Decks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List Anki note types
    NoteTypes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the fields of a note type
    Fields {
        /// Note type name
        note_type: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List unmastered words from the vocabulary database
    Words {
        /// Maximum number of words to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a raw AnkiConnect action and print its result
    Request {
        /// Action name, e.g. deckNames
        action: String,
        /// Action parameters as a JSON object
        #[arg(long, value_name = "JSON")]
        params: Option<String>,
    },
    /// Manage persisted settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ImportArgs {
    /// Target deck (created when missing)
    #[arg(long)]
    pub deck: Option<String>,
    /// Note type of the created notes
    #[arg(long, value_name = "NAME")]
    pub note_type: Option<String>,
    /// Field receiving the word itself
    #[arg(long, value_name = "FIELD")]
    pub word_field: Option<String>,
    /// Field receiving the sentence the word was looked up in
    #[arg(long, value_name = "FIELD")]
    pub usage_field: Option<String>,
    /// Tag to attach (repeatable; `auto-generated` is always added)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    /// Reject notes whose first field duplicates an existing note
    #[arg(long)]
    pub no_duplicates: bool,
    /// Show the notes that would be added without adding them
    #[arg(long)]
    pub dry_run: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update the settings file
    Init(ConfigInitArgs),
    /// Print the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ConfigInitArgs {
    /// AnkiConnect endpoint
    #[arg(long = "url", value_name = "URL")]
    pub anki_connect_url: Option<String>,
    /// AnkiConnect API version
    #[arg(long = "api-version", value_name = "N")]
    pub anki_connect_version: Option<u32>,
    /// Request timeout in seconds (0 disables it)
    #[arg(long = "timeout", value_name = "SECS")]
    pub request_timeout_secs: Option<u64>,
    /// Path to vocab.db
    #[arg(long = "vocab-db", value_name = "PATH")]
    pub vocab_db_path: Option<PathBuf>,
    /// Default target deck
    #[arg(long = "deck")]
    pub default_deck: Option<String>,
    /// Default note type
    #[arg(long = "note-type", value_name = "NAME")]
    pub default_note_type: Option<String>,
    /// Default field for the word
    #[arg(long, value_name = "FIELD")]
    pub word_field: Option<String>,
    /// Default field for the usage sentence
    #[arg(long, value_name = "FIELD")]
    pub usage_field: Option<String>,
    /// Default tags (repeatable); replaces the stored list
    #[arg(long = "tag", value_name = "TAG")]
    pub default_tags: Vec<String>,
}
