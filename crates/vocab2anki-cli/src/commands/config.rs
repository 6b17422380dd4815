use vocab2anki_core::config::normalize_endpoint_url;
use vocab2anki_core::util::normalize_text_option;

use crate::cli::{ConfigCommands, ConfigInitArgs};
use crate::cli_config::{default_config_path, CliConfig};
use crate::commands::common::load_config;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init(args) => run_config_init(args),
        ConfigCommands::Show { json } => run_config_show(json),
    }
}

pub fn run_config_init(args: ConfigInitArgs) -> Result<(), CliError> {
    let mut config = load_config()?;
    merge_init_args(&mut config, args)?;

    let path = config.save().map_err(CliError::Config)?;
    println!("Settings saved to {}", path.display());
    Ok(())
}

/// Apply the given options on top of the stored settings.
///
/// Options left out keep their stored value; `--tag` replaces the whole list.
pub fn merge_init_args(config: &mut CliConfig, args: ConfigInitArgs) -> Result<(), CliError> {
    config.version = 1;

    if let Some(url) = normalize_text_option(args.anki_connect_url) {
        config.anki_connect_url = Some(normalize_endpoint_url(&url)?);
    }
    if let Some(version) = args.anki_connect_version {
        config.anki_connect_version = Some(version);
    }
    if let Some(secs) = args.request_timeout_secs {
        config.request_timeout_secs = (secs > 0).then_some(secs);
    }
    if let Some(path) = args.vocab_db_path {
        config.vocab_db_path = Some(path);
    }
    if let Some(deck) = normalize_text_option(args.default_deck) {
        config.default_deck = Some(deck);
    }
    if let Some(note_type) = normalize_text_option(args.default_note_type) {
        config.default_note_type = Some(note_type);
    }
    if let Some(field) = normalize_text_option(args.word_field) {
        config.word_field = Some(field);
    }
    if let Some(field) = normalize_text_option(args.usage_field) {
        config.usage_field = Some(field);
    }
    if !args.default_tags.is_empty() {
        config.default_tags = args.default_tags;
    }
    Ok(())
}

pub fn run_config_show(as_json: bool) -> Result<(), CliError> {
    let config = load_config()?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = default_config_path().map_err(CliError::Config)?;
    println!("config file:      {}", path.display());
    for line in format_config_lines(&config) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_config_lines(config: &CliConfig) -> Vec<String> {
    let unset = || "(not set)".to_string();
    vec![
        format!(
            "anki connect url: {}",
            config.anki_connect_url.clone().unwrap_or_else(unset)
        ),
        format!(
            "api version:      {}",
            config
                .anki_connect_version
                .map_or_else(unset, |version| version.to_string())
        ),
        format!(
            "timeout:          {}",
            config
                .request_timeout_secs
                .map_or_else(unset, |secs| format!("{secs}s"))
        ),
        format!(
            "vocab db:         {}",
            config
                .vocab_db_path
                .as_ref()
                .map_or_else(unset, |path| path.display().to_string())
        ),
        format!(
            "deck:             {}",
            config.default_deck.clone().unwrap_or_else(unset)
        ),
        format!(
            "note type:        {}",
            config.default_note_type.clone().unwrap_or_else(unset)
        ),
        format!(
            "word field:       {}",
            config.word_field.clone().unwrap_or_else(unset)
        ),
        format!(
            "usage field:      {}",
            config.usage_field.clone().unwrap_or_else(unset)
        ),
        format!(
            "tags:             {}",
            if config.default_tags.is_empty() {
                unset()
            } else {
                config.default_tags.join(" ")
            }
        ),
    ]
}
