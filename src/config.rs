//! Settings and secrets loaded from the config directory
//!
//! Both files are optional YAML documents in `~/.stedi-runner/`. A missing
//! file means defaults; a malformed one is reported and ignored.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    BASE_URL, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BATCH_PREVIEW_CHARS,
    DEFAULT_TEXT_PREVIEW_CHARS, SECRETS_FILE_NAME,
};
use crate::error::RunnerError;
use crate::models::AuthHeaderStyle;

/// User-tunable settings
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub auth_header: AuthHeaderStyle,
    pub text_preview_chars: usize,
    pub batch_preview_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: BASE_URL.to_string(),
            auth_header: AuthHeaderStyle::Authorization,
            text_preview_chars: DEFAULT_TEXT_PREVIEW_CHARS,
            batch_preview_chars: DEFAULT_BATCH_PREVIEW_CHARS,
        }
    }
}

impl Settings {
    /// Parse settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, RunnerError> {
        let content = fs::read_to_string(path)
            .map_err(|e| RunnerError::Config(format!("{}: {}", path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| RunnerError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load settings, falling back to defaults when the file is absent or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Settings::default();
        }
        match Settings::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable settings file");
                Settings::default()
            }
        }
    }
}

/// Key/value secrets, e.g. `STEDI_API_KEY: sk_live_...`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SecretsStore {
    values: HashMap<String, String>,
}

impl SecretsStore {
    pub fn new(values: HashMap<String, String>) -> Self {
        SecretsStore { values }
    }

    /// Read a secrets file; absent or malformed files give an empty store
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return SecretsStore::default(),
        };
        if content.trim().is_empty() {
            return SecretsStore::default();
        }
        match serde_yaml::from_str::<HashMap<String, String>>(&content) {
            Ok(values) => SecretsStore { values },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed secrets file");
                SecretsStore::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Locations of config.yaml and secrets.yaml
#[derive(Clone, Debug)]
pub struct ConfigPaths {
    pub settings: PathBuf,
    pub secrets: PathBuf,
}

impl ConfigPaths {
    /// `~/.stedi-runner/`, or an explicit settings file whose directory also holds the secrets
    pub fn resolve(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => {
                let dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                ConfigPaths {
                    settings: path.to_path_buf(),
                    secrets: dir.join(SECRETS_FILE_NAME),
                }
            }
            None => {
                let dir = dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(CONFIG_DIR_NAME);
                ConfigPaths {
                    settings: dir.join(CONFIG_FILE_NAME),
                    secrets: dir.join(SECRETS_FILE_NAME),
                }
            }
        }
    }
}
