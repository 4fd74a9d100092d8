//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Base URL of the Stedi healthcare API
pub const BASE_URL: &str = "https://healthcare.us.stedi.com/2024-04-01";

/// Name of the credential in the environment and in the secrets store
pub const API_KEY_VAR: &str = "STEDI_API_KEY";

/// Directory (under the home directory) holding config.yaml and secrets.yaml
pub const CONFIG_DIR_NAME: &str = ".stedi-runner";

pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const SECRETS_FILE_NAME: &str = "secrets.yaml";

/// Log file used while the terminal UI owns the screen
pub const LOG_FILE_NAME: &str = "stedi-runner.log";

/// Characters of a non-JSON body printed by `--run`
pub const DEFAULT_TEXT_PREVIEW_CHARS: usize = 1000;

/// Characters of a non-JSON body kept in batch previews
pub const DEFAULT_BATCH_PREVIEW_CHARS: usize = 500;

/// Timestamp format for request results
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Application name
pub const APP_NAME: &str = "Stedi Healthcare API Request Runner";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
