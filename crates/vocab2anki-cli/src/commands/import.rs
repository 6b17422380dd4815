use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use vocab2anki_core::import::ImportPlan;
use vocab2anki_core::util::{normalize_text_option, split_tags};
use vocab2anki_core::{AnkiClient, FieldMapping};

use crate::cli::ImportArgs;
use crate::cli_config::CliConfig;
use crate::commands::common::{
    format_note_preview, load_config, note_to_preview_item, open_client, print_available,
    prompt_line, prompt_required, read_unmastered_words, NotePreviewItem,
};
use crate::error::CliError;

pub async fn run_import(
    args: ImportArgs,
    db_path: Option<PathBuf>,
    anki_url: Option<String>,
) -> Result<(), CliError> {
    let config = load_config()?;
    let client = open_client(&config, anki_url)?;

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let plan = resolve_plan(&args, &config, &client, &mut input, &mut output, interactive).await?;
    plan.validate_mapping(&client).await?;

    let words = read_unmastered_words(&config.resolve_vocab_db_path(db_path))?;

    if args.dry_run {
        let notes = plan.build_notes(&words);
        if args.json {
            let items = notes
                .iter()
                .map(note_to_preview_item)
                .collect::<Vec<NotePreviewItem>>();
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            for note in &notes {
                println!("{}", format_note_preview(note));
            }
            println!("{} notes would be added to {}.", notes.len(), plan.deck);
        }
        return Ok(());
    }

    let report = plan.run(&client, &words).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Added {} notes to {}.", report.added.len(), report.deck);
    }
    Ok(())
}

/// Fill in everything the flags and config leave open by asking on `input`.
///
/// Decks, note types and fields are listed from Anki right before the
/// matching question.
pub async fn resolve_plan<R: BufRead, W: Write>(
    args: &ImportArgs,
    config: &CliConfig,
    client: &AnkiClient,
    input: &mut R,
    output: &mut W,
    interactive: bool,
) -> Result<ImportPlan, CliError> {
    let deck = if let Some(deck) = pick(args.deck.as_deref(), config.default_deck.as_deref()) {
        deck
    } else {
        print_available(output, "decks", &client.deck_names().await?)?;
        prompt_required(input, output, "Target deck name", "deck name")?
    };

    let note_type = if let Some(note_type) =
        pick(args.note_type.as_deref(), config.default_note_type.as_deref())
    {
        note_type
    } else {
        print_available(output, "note types", &client.model_names().await?)?;
        prompt_required(input, output, "Target note type", "note type")?
    };

    let word_field = pick(args.word_field.as_deref(), config.word_field.as_deref());
    let usage_field = pick(args.usage_field.as_deref(), config.usage_field.as_deref());
    if word_field.is_none() || usage_field.is_none() {
        print_available(
            output,
            "fields",
            &client.model_field_names(&note_type).await?,
        )?;
    }
    let word_field = match word_field {
        Some(field) => field,
        None => prompt_required(
            input,
            output,
            "Field to assign the actual words to",
            "word field",
        )?,
    };
    let usage_field = match usage_field {
        Some(field) => field,
        None => prompt_required(
            input,
            output,
            "Field to assign the context of the words to",
            "usage field",
        )?,
    };

    let tags = if !args.tags.is_empty() {
        args.tags.clone()
    } else if !config.default_tags.is_empty() {
        config.default_tags.clone()
    } else if interactive {
        prompt_line(input, output, "Tags (separated by spaces)")?
            .map(|raw| split_tags(&raw))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    Ok(
        ImportPlan::new(deck, note_type, FieldMapping::new(word_field, usage_field)?)?
            .with_tags(&tags)
            .allow_duplicate(!args.no_duplicates),
    )
}

fn pick(flag: Option<&str>, configured: Option<&str>) -> Option<String> {
    normalize_text_option(flag.map(str::to_string)).or_else(|| configured.map(str::to_string))
}
