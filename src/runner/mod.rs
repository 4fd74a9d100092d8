//! Runner - payload editing and request execution over one session
//!
//! Owns the session state for every catalog entry. Single requests honour
//! the user's edited payload; batch runs (see [`batch`]) always send each
//! executor's own example body.

pub mod batch;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;

use chrono::Local;
use serde_json::{Map, Value};

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::Settings;
use crate::credentials::{CredentialSource, RedactedCredentials, REDACTED_KEY};
use crate::error::RunnerError;
use crate::models::{RequestPlan, RequestResult, ResponseBody};
use crate::network::Transport;
use crate::script::EvalContext;

pub use batch::{BatchOutcome, BatchProgress, BatchReport};
pub use session::{MemorySession, PayloadState, RejectedEdit, SessionStore};

pub struct Runner {
    catalog: Catalog,
    credentials: Box<dyn CredentialSource>,
    transport: Box<dyn Transport>,
    session: Box<dyn SessionStore>,
    settings: Settings,
}

impl Runner {
    pub fn new(
        catalog: Catalog,
        credentials: Box<dyn CredentialSource>,
        transport: Box<dyn Transport>,
        settings: Settings,
    ) -> Self {
        Runner {
            catalog,
            credentials,
            transport,
            session: Box::new(MemorySession::new()),
            settings,
        }
    }

    pub fn with_session(mut self, session: Box<dyn SessionStore>) -> Self {
        self.session = session;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn entry(&self, id: u32) -> Result<&'static CatalogEntry, RunnerError> {
        self.catalog.get(id).ok_or(RunnerError::UnknownRequest(id))
    }

    /// Example body of an entry, recovered from its executor source
    pub fn default_payload(&self, id: u32) -> Result<Option<Value>, RunnerError> {
        let entry = self.entry(id)?;
        let ctx = EvalContext::new(&self.settings.base_url, &RedactedCredentials);
        Ok(entry.executor.default_payload(&ctx))
    }

    /// Payload state of an entry, loading the default on first view
    pub fn view(&mut self, id: u32) -> Result<&PayloadState, RunnerError> {
        if self.session.payload(id).is_none() {
            self.load_default(id)?;
        }
        self.session.payload(id).ok_or(RunnerError::ExtractionFailed)
    }

    /// Payload state without loading anything
    pub fn payload_state(&self, id: u32) -> Option<&PayloadState> {
        self.session.payload(id)
    }

    /// Pretty JSON of the current payload, `{}` when none is available
    pub fn payload_text(&mut self, id: u32) -> Result<String, RunnerError> {
        let state = self.view(id)?;
        Ok(match state.value() {
            Some(value) => pretty(value),
            None => "{}".to_string(),
        })
    }

    /// Store the user's edit. Invalid JSON keeps the previous value.
    pub fn edit_payload(&mut self, id: u32, text: &str) -> Result<(), RunnerError> {
        self.view(id)?;
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                self.session.set_payload(
                    id,
                    PayloadState::Edited {
                        value,
                        rejected: None,
                    },
                );
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                let previous = self.session.payload(id).and_then(|s| s.value().cloned());
                if previous.is_none() {
                    tracing::warn!(id, "No previous payload to keep; using an empty object");
                }
                self.session.set_payload(
                    id,
                    PayloadState::Edited {
                        value: previous.unwrap_or_else(|| Value::Object(Map::new())),
                        rejected: Some(RejectedEdit {
                            text: text.to_string(),
                            message: message.clone(),
                        }),
                    },
                );
                Err(RunnerError::InvalidUserPayload(message))
            }
        }
    }

    /// Re-extract the default payload, discarding any edit
    pub fn refresh(&mut self, id: u32) -> Result<&PayloadState, RunnerError> {
        self.load_default(id)?;
        self.session.payload(id).ok_or(RunnerError::ExtractionFailed)
    }

    fn load_default(&mut self, id: u32) -> Result<(), RunnerError> {
        let default = self.default_payload(id)?;
        if default.is_none() && self.entry(id)?.method.has_body() {
            tracing::warn!(id, "{}", RunnerError::ExtractionFailed);
        }
        self.session.set_payload(id, PayloadState::from_default(default));
        Ok(())
    }

    /// Body a run would send: the edit, else the extracted default, else `{}`
    pub fn resolve_payload(&self, id: u32) -> Result<Value, RunnerError> {
        if let Some(value) = self.session.payload(id).and_then(PayloadState::value) {
            return Ok(value.clone());
        }
        Ok(self
            .default_payload(id)?
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    fn plan_with(
        &self,
        entry: &CatalogEntry,
        credentials: &dyn CredentialSource,
    ) -> Result<RequestPlan, RunnerError> {
        let ctx = EvalContext::new(&self.settings.base_url, credentials);
        entry
            .executor
            .plan(entry.method, &ctx, self.settings.auth_header)
    }

    /// Body `run` sends. Unedited defaults are extracted again with the live
    /// credential; the session copy holds the redacted placeholder.
    fn run_payload(&self, entry: &CatalogEntry) -> Result<Value, RunnerError> {
        let value = match self.session.payload(entry.id) {
            Some(PayloadState::Edited { value, .. }) => value.clone(),
            _ => {
                let ctx = EvalContext::new(&self.settings.base_url, self.credentials.as_ref());
                entry
                    .executor
                    .default_payload(&ctx)
                    .unwrap_or_else(|| Value::Object(Map::new()))
            }
        };
        if holds_redacted_key(&value) {
            return Err(RunnerError::RedactedCredential(entry.id));
        }
        Ok(value)
    }

    fn required_body(&self, entry: &CatalogEntry) -> Result<Option<Value>, RunnerError> {
        if !entry.method.has_body() {
            return Ok(None);
        }
        match self.run_payload(entry)? {
            Value::Object(map) if !map.is_empty() => Ok(Some(Value::Object(map))),
            _ => Err(RunnerError::MissingBody {
                id: entry.id,
                method: entry.method.to_string(),
            }),
        }
    }

    /// Send one request with the session's payload and record the result
    pub async fn run(&mut self, id: u32) -> Result<RequestResult, RunnerError> {
        let entry = self.entry(id)?;
        let body = self.required_body(entry)?;
        self.credentials.api_key()?;

        let mut plan = self.plan_with(entry, self.credentials.as_ref())?;
        plan.body = body;
        self.execute(id, &plan).await
    }

    /// Send one request exactly as its executor builds it
    pub async fn run_executor(&mut self, id: u32) -> Result<RequestResult, RunnerError> {
        let entry = self.entry(id)?;
        self.credentials.api_key()?;

        let plan = self.plan_with(entry, self.credentials.as_ref())?;
        self.execute(id, &plan).await
    }

    /// The request `run` would send, with the credential redacted
    pub fn dry_run(&self, id: u32) -> Result<RequestPlan, RunnerError> {
        let entry = self.entry(id)?;
        let mut plan = self.plan_with(entry, &RedactedCredentials)?;
        if entry.method.has_body() {
            plan.body = Some(self.resolve_payload(id)?);
        }
        Ok(plan)
    }

    async fn execute(&mut self, id: u32, plan: &RequestPlan) -> Result<RequestResult, RunnerError> {
        tracing::info!(id, method = %plan.method, url = %plan.url, "Running request");
        let raw = self.transport.send(plan).await?;

        let result = RequestResult {
            status: raw.status,
            reason: raw.reason,
            headers: raw.headers,
            elapsed: raw.elapsed,
            body: ResponseBody::parse(raw.body),
            timestamp: Local::now(),
        };
        self.session.set_result(id, result.clone());
        Ok(result)
    }

    pub fn result(&self, id: u32) -> Option<&RequestResult> {
        self.session.result(id)
    }

    pub fn result_count(&self) -> usize {
        self.session.result_count()
    }

    pub fn clear_result(&mut self, id: u32) -> Option<RequestResult> {
        self.session.remove_result(id)
    }

    pub fn clear_results(&mut self) {
        self.session.clear_results();
    }

    /// Forget every payload and result
    pub fn reset(&mut self) {
        self.session.clear();
    }
}

fn holds_redacted_key(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains(REDACTED_KEY),
        Value::Array(items) => items.iter().any(holds_redacted_key),
        Value::Object(map) => map.values().any(holds_redacted_key),
        _ => false,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
