//! Persistent CLI configuration.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vocab2anki_core::config::{AnkiConnectConfig, DEFAULT_VOCAB_DB_PATH};
use vocab2anki_core::util::normalize_text_option;

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub anki_connect_url: Option<String>,
    #[serde(default)]
    pub anki_connect_version: Option<u32>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub vocab_db_path: Option<PathBuf>,
    #[serde(default)]
    pub default_deck: Option<String>,
    #[serde(default)]
    pub default_note_type: Option<String>,
    #[serde(default)]
    pub word_field: Option<String>,
    #[serde(default)]
    pub usage_field: Option<String>,
    #[serde(default)]
    pub default_tags: Vec<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    if let Some(path) = env::var_os("VOCAB2ANKI_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("vocab2anki").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Flag, then `VOCAB_DB_PATH`, then the config file, then the Kindle mount point.
    pub fn resolve_vocab_db_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| env::var_os("VOCAB_DB_PATH").map(PathBuf::from))
            .or_else(|| self.vocab_db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VOCAB_DB_PATH))
    }

    /// Flag, then `ANKI_CONNECT_URL` / `ANKI_CONNECT_VERSION`, then the config file.
    pub fn resolve_anki_config(
        &self,
        explicit_url: Option<String>,
    ) -> Result<AnkiConnectConfig, String> {
        let url = normalize_text_option(explicit_url)
            .or_else(|| normalize_text_option(env::var("ANKI_CONNECT_URL").ok()))
            .or_else(|| self.anki_connect_url.clone());
        let version = match normalize_text_option(env::var("ANKI_CONNECT_VERSION").ok()) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| format!("ANKI_CONNECT_VERSION must be a number (got `{raw}`)"))?,
            ),
            None => self.anki_connect_version,
        };

        AnkiConnectConfig::resolve(url, version, self.request_timeout_secs)
            .map_err(|error| error.to_string())
    }

    fn normalize(&mut self) {
        self.anki_connect_url = normalize_text_option(self.anki_connect_url.clone());
        self.default_deck = normalize_text_option(self.default_deck.clone());
        self.default_note_type = normalize_text_option(self.default_note_type.clone());
        self.word_field = normalize_text_option(self.word_field.clone());
        self.usage_field = normalize_text_option(self.usage_field.clone());
        self.default_tags = self
            .default_tags
            .iter()
            .flat_map(|tag| tag.split_whitespace())
            .map(ToString::to_string)
            .collect();
    }
}
