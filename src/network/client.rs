//! HTTP client wrapper - executes planned requests with reqwest

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::RunnerError;
use crate::models::{HttpMethod, RequestPlan};
use crate::network::{RawResponse, Transport};

/// Build a reqwest request from a plan
fn build_request(client: &reqwest::Client, plan: &RequestPlan) -> reqwest::RequestBuilder {
    let mut req_builder = match plan.method {
        HttpMethod::GET => client.get(&plan.url),
        HttpMethod::POST => client.post(&plan.url),
        HttpMethod::PUT => client.put(&plan.url),
        HttpMethod::PATCH => client.patch(&plan.url),
        HttpMethod::DELETE => client.delete(&plan.url),
    };

    for (key, value) in &plan.headers {
        req_builder = req_builder.header(key, value);
    }

    if !plan.query.is_empty() {
        req_builder = req_builder.query(&plan.query);
    }

    if plan.method.has_body() {
        if let Some(body) = &plan.body {
            req_builder = req_builder.json(body);
        }
    }

    req_builder
}

/// Create an HTTP client; timeouts are reqwest's defaults
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("Request timed out: {}", error)
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: create_client(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, plan: &RequestPlan) -> Result<RawResponse, RunnerError> {
        let start = Instant::now();
        tracing::info!(url = %plan.url, method = %plan.method, "Executing request");

        let resp = build_request(&self.client, plan)
            .send()
            .await
            .map_err(|e| RunnerError::Transport(describe(&e)))?;

        let status = resp.status();
        let headers: BTreeMap<String, String> = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = resp
            .text()
            .await
            .map_err(|e| RunnerError::Transport(format!("Error reading body: {}", e)))?;
        let elapsed = start.elapsed();

        tracing::info!(status = status.as_u16(), elapsed_ms = elapsed.as_millis() as u64, "Request completed");

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            body,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(method: HttpMethod) -> RequestPlan {
        RequestPlan {
            method,
            url: "https://example.com/payers".to_string(),
            headers: vec![
                ("Authorization".to_string(), "key".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            query: vec![("businessId".to_string(), "123".to_string())],
            body: Some(json!({"a": 1})),
        }
    }

    #[test]
    fn test_build_request_with_body() {
        let client = create_client();
        let request = build_request(&client, &plan(HttpMethod::POST)).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://example.com/payers?businessId=123");
        assert_eq!(request.headers()["authorization"], "key");
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"a":1}"#);
    }

    #[test]
    fn test_get_sends_no_body() {
        let client = create_client();
        let request = build_request(&client, &plan(HttpMethod::GET)).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert!(request.body().is_none());
    }
}
