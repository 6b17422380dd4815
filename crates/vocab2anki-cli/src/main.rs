//! vocab2anki CLI - Turn Kindle Vocabulary Builder lookups into Anki notes
//!
//! Reads unmastered words from the Kindle's `vocab.db` and adds them to Anki
//! through the AnkiConnect add-on.

mod cli;
mod cli_config;
mod commands;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::import::run_import;
use crate::commands::list::{run_decks, run_fields, run_note_types, run_words};
use crate::commands::request::run_request;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        if let Some(hint) = error.hint() {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vocab2anki=info,vocab2anki_core=info")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = cli.db_path;
    let anki_url = cli.anki_url;

    match cli.command {
        None => run_import(cli::ImportArgs::default(), db_path, anki_url).await?,
        Some(Commands::Import(args)) => run_import(args, db_path, anki_url).await?,
        Some(Commands::Decks { json }) => run_decks(json, anki_url).await?,
        Some(Commands::NoteTypes { json }) => run_note_types(json, anki_url).await?,
        Some(Commands::Fields { note_type, json }) => {
            run_fields(&note_type, json, anki_url).await?;
        }
        Some(Commands::Words { limit, json }) => run_words(limit, json, db_path)?,
        Some(Commands::Request { action, params }) => {
            run_request(&action, params.as_deref(), anki_url).await?;
        }
        Some(Commands::Config { command }) => run_config(command)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
