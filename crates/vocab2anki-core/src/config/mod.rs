//! AnkiConnect connection settings.
//!
//! The endpoint, API version, and optional request timeout used to be fixed
//! constants; they are carried here so callers can point the client at a
//! non-default port or host.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Default AnkiConnect listen address.
pub const DEFAULT_ANKI_CONNECT_URL: &str = "http://localhost:8765";
/// AnkiConnect API version requested by default.
pub const DEFAULT_ANKI_CONNECT_VERSION: u32 = 6;
/// Where a Kindle mounts its Vocabulary Builder database on macOS.
pub const DEFAULT_VOCAB_DB_PATH: &str = "/Volumes/Kindle/system/vocabulary/vocab.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnkiConnectConfig {
    /// Endpoint that receives the JSON-RPC POSTs
    pub url: String,
    /// Value sent as `version` in every request
    pub version: u32,
    /// Per-request timeout; `None` waits on the transport default
    pub timeout: Option<Duration>,
}

impl Default for AnkiConnectConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ANKI_CONNECT_URL.to_string(),
            version: DEFAULT_ANKI_CONNECT_VERSION,
            timeout: None,
        }
    }
}

impl AnkiConnectConfig {
    /// Create a configuration for the given endpoint with the default version.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            url: normalize_endpoint_url(url.as_ref())?,
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a configuration from optional overrides, falling back to defaults.
    pub fn resolve(
        url: Option<String>,
        version: Option<u32>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let mut config = match normalize_text_option(url) {
            Some(url) => Self::new(url)?,
            None => Self::default(),
        };
        if let Some(version) = version {
            config = config.with_version(version);
        }
        if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Trim the endpoint, drop trailing slashes, and require an HTTP scheme.
pub fn normalize_endpoint_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfiguration(
            "AnkiConnect URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidConfiguration(format!(
            "AnkiConnect URL must include http:// or https:// (got `{trimmed}`)"
        )));
    }
    Ok(trimmed.to_string())
}
