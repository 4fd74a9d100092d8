//! Per-session payload and result state

use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::RequestResult;

/// An edit that did not parse, kept for display next to the retained value
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedEdit {
    pub text: String,
    pub message: String,
}

/// Editable payload of one catalog entry. No entry in the store means the
/// entry has not been viewed yet.
#[derive(Clone, Debug, PartialEq)]
pub enum PayloadState {
    DefaultLoaded(Value),
    DefaultUnavailable,
    Edited {
        value: Value,
        rejected: Option<RejectedEdit>,
    },
}

impl PayloadState {
    pub fn from_default(default: Option<Value>) -> Self {
        match default {
            Some(value) => PayloadState::DefaultLoaded(value),
            None => PayloadState::DefaultUnavailable,
        }
    }

    /// Current value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            PayloadState::DefaultLoaded(value) | PayloadState::Edited { value, .. } => Some(value),
            PayloadState::DefaultUnavailable => None,
        }
    }

    pub fn rejected(&self) -> Option<&RejectedEdit> {
        match self {
            PayloadState::Edited { rejected, .. } => rejected.as_ref(),
            _ => None,
        }
    }

    pub fn is_edited(&self) -> bool {
        matches!(self, PayloadState::Edited { .. })
    }
}

/// Storage for payload state and results, keyed by entry id
pub trait SessionStore {
    fn payload(&self, id: u32) -> Option<&PayloadState>;
    fn set_payload(&mut self, id: u32, state: PayloadState);

    fn result(&self, id: u32) -> Option<&RequestResult>;
    fn set_result(&mut self, id: u32, result: RequestResult);
    fn remove_result(&mut self, id: u32) -> Option<RequestResult>;
    fn clear_results(&mut self);
    fn result_count(&self) -> usize;

    /// Drop all payloads and results
    fn clear(&mut self);
}

#[derive(Debug, Default)]
pub struct MemorySession {
    payloads: BTreeMap<u32, PayloadState>,
    results: BTreeMap<u32, RequestResult>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn payload(&self, id: u32) -> Option<&PayloadState> {
        self.payloads.get(&id)
    }

    fn set_payload(&mut self, id: u32, state: PayloadState) {
        self.payloads.insert(id, state);
    }

    fn result(&self, id: u32) -> Option<&RequestResult> {
        self.results.get(&id)
    }

    fn set_result(&mut self, id: u32, result: RequestResult) {
        self.results.insert(id, result);
    }

    fn remove_result(&mut self, id: u32) -> Option<RequestResult> {
        self.results.remove(&id)
    }

    fn clear_results(&mut self) {
        self.results.clear();
    }

    fn result_count(&self) -> usize {
        self.results.len()
    }

    fn clear(&mut self) {
        self.payloads.clear();
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_state_value() {
        assert_eq!(
            PayloadState::from_default(Some(json!({"a": 1}))).value(),
            Some(&json!({"a": 1}))
        );
        assert_eq!(PayloadState::from_default(None).value(), None);

        let edited = PayloadState::Edited {
            value: json!({}),
            rejected: Some(RejectedEdit {
                text: "{".into(),
                message: "EOF".into(),
            }),
        };
        assert!(edited.is_edited());
        assert_eq!(edited.rejected().map(|r| r.text.as_str()), Some("{"));
    }

    #[test]
    fn test_memory_session_clear() {
        let mut session = MemorySession::new();
        session.set_payload(1, PayloadState::DefaultUnavailable);
        assert!(session.payload(1).is_some());
        session.clear();
        assert!(session.payload(1).is_none());
        assert_eq!(session.result_count(), 0);
    }
}
