//! Credential resolution
//!
//! The API key is looked up in a fixed order: secrets store, environment
//! variable, then the explicit override handed in at construction.

use crate::config::SecretsStore;
use crate::constants::API_KEY_VAR;
use crate::error::RunnerError;

/// Something that can produce the API key on demand
pub trait CredentialSource {
    fn api_key(&self) -> Result<String, RunnerError>;
}

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub struct CredentialResolver {
    secrets: SecretsStore,
    override_key: Option<String>,
    env: EnvLookup,
}

impl CredentialResolver {
    pub fn new(secrets: SecretsStore, override_key: Option<String>) -> Self {
        CredentialResolver {
            secrets,
            override_key,
            env: process_env,
        }
    }

    /// Replace the environment lookup (tests use a fixed table)
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    pub fn resolve(&self) -> Result<String, RunnerError> {
        if let Some(key) = self.secrets.get(API_KEY_VAR) {
            tracing::debug!("API key resolved from secrets store");
            return Ok(key.to_string());
        }
        if let Some(key) = (self.env)(API_KEY_VAR).filter(|k| !k.is_empty()) {
            tracing::debug!("API key resolved from environment");
            return Ok(key);
        }
        if let Some(key) = self.override_key.as_deref().filter(|k| !k.is_empty()) {
            tracing::debug!("API key resolved from --api-key");
            return Ok(key.to_string());
        }
        Err(RunnerError::CredentialMissing)
    }
}

impl CredentialSource for CredentialResolver {
    fn api_key(&self) -> Result<String, RunnerError> {
        self.resolve()
    }
}

/// Placeholder credentials for dry runs and previews
pub struct RedactedCredentials;

pub const REDACTED_KEY: &str = "<redacted>";

impl CredentialSource for RedactedCredentials {
    fn api_key(&self) -> Result<String, RunnerError> {
        Ok(REDACTED_KEY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_key(key: &str) -> Option<String> {
        (key == API_KEY_VAR).then(|| "from-env".to_string())
    }

    fn secrets(value: &str) -> SecretsStore {
        SecretsStore::new(HashMap::from([(API_KEY_VAR.to_string(), value.to_string())]))
    }

    #[test]
    fn test_priority_order() {
        let resolver = CredentialResolver::new(secrets("from-secrets"), Some("from-flag".into()))
            .with_env(env_key);
        assert_eq!(resolver.resolve().unwrap(), "from-secrets");

        let resolver = CredentialResolver::new(SecretsStore::default(), Some("from-flag".into()))
            .with_env(env_key);
        assert_eq!(resolver.resolve().unwrap(), "from-env");

        let resolver = CredentialResolver::new(SecretsStore::default(), Some("from-flag".into()))
            .with_env(no_env);
        assert_eq!(resolver.resolve().unwrap(), "from-flag");
    }

    #[test]
    fn test_missing_everywhere() {
        let resolver = CredentialResolver::new(SecretsStore::default(), None).with_env(no_env);
        assert_eq!(resolver.resolve(), Err(RunnerError::CredentialMissing));

        let resolver =
            CredentialResolver::new(secrets(""), Some(String::new())).with_env(|_| Some(String::new()));
        assert_eq!(resolver.api_key(), Err(RunnerError::CredentialMissing));
    }

    #[test]
    fn test_redacted() {
        assert_eq!(RedactedCredentials.api_key().unwrap(), REDACTED_KEY);
    }
}
