//! Network layer - sends planned requests over HTTP
//!
//! The runner talks to a [`Transport`]; [`HttpTransport`] is the reqwest
//! implementation and tests substitute their own.

pub mod client;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::RunnerError;
use crate::models::RequestPlan;

pub use client::HttpTransport;

/// Response as received, before body decoding
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub elapsed: Duration,
}

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, plan: &RequestPlan) -> Result<RawResponse, RunnerError>;
}
