//! Error taxonomy shared by the runner, executors and front ends

use thiserror::Error;

/// Errors surfaced by catalog lookups, credential resolution and request execution.
///
/// Extraction problems never reach callers as errors; the extractor degrades
/// to "no default payload" instead. `ExtractionFailed` exists for the front
/// ends that want to report that state as a warning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunnerError {
    #[error("API key not found. Set STEDI_API_KEY in secrets.yaml or the environment, or use --api-key")]
    CredentialMissing,

    #[error("Could not extract a default payload from the request source")]
    ExtractionFailed,

    #[error("Invalid JSON format: {0}")]
    InvalidUserPayload(String),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request {0} not found. Use --list to see all requests.")]
    UnknownRequest(u32),

    #[error("Request {id} ({method}) needs a non-empty JSON object body")]
    MissingBody { id: u32, method: String },

    #[error("Request {0} payload still holds the redacted API key placeholder")]
    RedactedCredential(u32),

    #[error("Executor '{name}' could not be evaluated: {message}")]
    ExecutorFailed { name: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RunnerError {
    /// Whether the error stops a single-request run before anything is sent
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RunnerError::CredentialMissing
                | RunnerError::UnsupportedMethod(_)
                | RunnerError::UnknownRequest(_)
                | RunnerError::ExecutorFailed { .. }
        )
    }
}
