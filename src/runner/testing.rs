//! Fake collaborators for runner tests

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use crate::credentials::{CredentialResolver, CredentialSource};
use crate::config::SecretsStore;
use crate::error::RunnerError;
use crate::models::RequestPlan;
use crate::network::{RawResponse, Transport};

/// Records every plan it is handed and answers with a canned response
#[derive(Clone, Default)]
pub struct FakeTransport {
    pub sent: Rc<RefCell<Vec<RequestPlan>>>,
    /// URL fragments that fail with a transport error
    pub failing: Rc<HashSet<String>>,
    pub status: u16,
    pub body: String,
}

impl FakeTransport {
    pub fn ok(body: &str) -> Self {
        FakeTransport {
            status: 200,
            body: body.to_string(),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, fragments: &[&str]) -> Self {
        self.failing = Rc::new(fragments.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn last_sent(&self) -> Option<RequestPlan> {
        self.sent.borrow().last().cloned()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, plan: &RequestPlan) -> Result<RawResponse, RunnerError> {
        self.sent.borrow_mut().push(plan.clone());
        if self.failing.iter().any(|f| plan.url.ends_with(f.as_str())) {
            return Err(RunnerError::Transport(format!("Connection failed: {}", plan.url)));
        }
        Ok(RawResponse {
            status: self.status,
            reason: Some("OK".to_string()),
            headers: BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
            body: self.body.clone(),
            elapsed: Duration::from_millis(5),
        })
    }
}

pub struct StaticKey(pub &'static str);

impl CredentialSource for StaticKey {
    fn api_key(&self) -> Result<String, RunnerError> {
        Ok(self.0.to_string())
    }
}

/// A resolver that finds nothing anywhere
pub fn no_credentials() -> CredentialResolver {
    CredentialResolver::new(SecretsStore::default(), None).with_env(|_| None)
}
