//! Request executors
//!
//! An executor is the script that knows how to build one request. Planning
//! evaluates it and turns its bindings into a [`RequestPlan`].

pub mod sources;

use serde_json::Value;

use crate::extract::extract_payload;
use crate::extract::scan::{dedent, flatten};
use crate::error::RunnerError;
use crate::models::{AuthHeaderStyle, HttpMethod, RequestPlan};
use crate::script::{self, Bindings, EvalContext, ScriptError};

#[derive(Debug)]
pub struct Executor {
    pub name: &'static str,
    pub source: &'static str,
}

impl Executor {
    /// Evaluate the script; indentation problems get one flattened retry
    pub fn bindings(&self, ctx: &EvalContext<'_>) -> Result<Bindings, RunnerError> {
        let result = match script::evaluate(&dedent(self.source), ctx) {
            Err(e) if e.is_syntax() => {
                tracing::debug!(executor = self.name, error = %e, "Retrying with flattened source");
                script::evaluate(&flatten(self.source), ctx)
            }
            other => other,
        };
        result.map_err(|e| self.failure(e))
    }

    /// Example body recovered from the source without evaluating the whole script
    pub fn default_payload(&self, ctx: &EvalContext<'_>) -> Option<Value> {
        extract_payload(self.source, ctx)
    }

    /// Build the outbound request from the script's `url`, `headers`, `params` and `payload`
    pub fn plan(
        &self,
        method: HttpMethod,
        ctx: &EvalContext<'_>,
        style: AuthHeaderStyle,
    ) -> Result<RequestPlan, RunnerError> {
        let bindings = self.bindings(ctx)?;

        let url = match bindings.get("url") {
            Some(Value::String(url)) => url.clone(),
            Some(_) => return Err(self.invalid("url must be a string")),
            None => return Err(self.invalid("url is not defined")),
        };

        let mut headers = match bindings.get("headers") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| match value {
                    Value::String(s) => Ok((key.clone(), s.clone())),
                    _ => Err(self.invalid(&format!("header '{}' must be a string", key))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(self.invalid("headers must be a dict")),
            None => vec![
                ("Authorization".to_string(), ctx.credentials.api_key()?),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
        };
        apply_auth_style(&mut headers, style);

        let query = match bindings.get("params") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| (key.clone(), query_value(value)))
                .collect(),
            Some(_) => return Err(self.invalid("params must be a dict")),
            None => Vec::new(),
        };

        let body = if method.has_body() {
            bindings.get("payload").filter(|v| !v.is_null()).cloned()
        } else {
            None
        };

        Ok(RequestPlan {
            method,
            url,
            headers,
            query,
            body,
        })
    }

    fn failure(&self, error: ScriptError) -> RunnerError {
        match error {
            ScriptError::Credential(inner) => inner,
            other => RunnerError::ExecutorFailed {
                name: self.name.to_string(),
                message: other.to_string(),
            },
        }
    }

    fn invalid(&self, message: &str) -> RunnerError {
        RunnerError::ExecutorFailed {
            name: self.name.to_string(),
            message: message.to_string(),
        }
    }
}

fn apply_auth_style(headers: &mut [(String, String)], style: AuthHeaderStyle) {
    if style == AuthHeaderStyle::Authorization {
        return;
    }
    for (key, _) in headers.iter_mut() {
        if key.eq_ignore_ascii_case("authorization") {
            *key = style.header_name().to_string();
        }
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::constants::BASE_URL;
    use crate::credentials::{CredentialSource, RedactedCredentials, REDACTED_KEY};
    use serde_json::json;

    struct NoKey;

    impl CredentialSource for NoKey {
        fn api_key(&self) -> Result<String, RunnerError> {
            Err(RunnerError::CredentialMissing)
        }
    }

    fn plan(executor: &Executor, method: HttpMethod) -> Result<RequestPlan, RunnerError> {
        let creds = RedactedCredentials;
        let ctx = EvalContext::new(BASE_URL, &creds);
        executor.plan(method, &ctx, AuthHeaderStyle::Authorization)
    }

    #[test]
    fn test_every_entry_plans() {
        let catalog = Catalog::new();
        for entry in catalog.iter() {
            let plan = plan(entry.executor, entry.method)
                .unwrap_or_else(|e| panic!("entry {} failed to plan: {}", entry.id, e));
            assert!(plan.url.starts_with(BASE_URL), "entry {}", entry.id);
            assert_eq!(plan.header("Authorization"), Some(REDACTED_KEY));
            assert_eq!(plan.body.is_some(), entry.method.has_body(), "entry {}", entry.id);
        }
    }

    #[test]
    fn test_path_parameters_are_substituted() {
        let catalog = Catalog::new();
        let plan = plan(catalog.get(9).unwrap().executor, HttpMethod::GET).unwrap();
        assert_eq!(
            plan.url,
            format!("{}/change/medicalnetwork/reports/v2/019a7b3c-5b91-7ae1-8213-0bd5ff204a6a/277", BASE_URL)
        );
    }

    #[test]
    fn test_params_become_query() {
        let catalog = Catalog::new();
        let plan = plan(catalog.get(14).unwrap().executor, HttpMethod::GET).unwrap();
        assert_eq!(plan.query, vec![("businessId".to_string(), "123456789".to_string())]);
        assert_eq!(plan.body, None);
    }

    #[test]
    fn test_missing_credential_surfaces() {
        let catalog = Catalog::new();
        let ctx = EvalContext::new(BASE_URL, &NoKey);
        let err = catalog
            .get(1)
            .unwrap()
            .executor
            .plan(HttpMethod::POST, &ctx, AuthHeaderStyle::Authorization)
            .unwrap_err();
        assert_eq!(err, RunnerError::CredentialMissing);
    }

    #[test]
    fn test_legacy_header_style() {
        let creds = RedactedCredentials;
        let ctx = EvalContext::new(BASE_URL, &creds);
        let plan = PAYERS_FOR_TEST
            .plan(HttpMethod::GET, &ctx, AuthHeaderStyle::XApiKey)
            .unwrap();
        assert_eq!(plan.header("X-API-Key"), Some(REDACTED_KEY));
        assert_eq!(plan.header("Authorization"), None);
        assert_eq!(plan.header("Content-Type"), Some("application/json"));
    }

    static PAYERS_FOR_TEST: Executor = Executor {
        name: "payers_default_headers",
        source: "url = f\"{BASE_URL}/payers\"\n",
    };

    #[test]
    fn test_column_zero_close_plans_after_flatten() {
        let executor = Executor {
            name: "generated",
            source: "    url = f\"{BASE_URL}/x\"\n    payload = {\n        \"a\": 1\n}\n",
        };
        let plan = plan(&executor, HttpMethod::POST).unwrap();
        assert_eq!(plan.body, Some(json!({"a": 1})));
    }

    #[test]
    fn test_bad_scripts_fail_with_executor_name() {
        let executor = Executor {
            name: "broken",
            source: "headers = {}\n",
        };
        assert!(matches!(
            plan(&executor, HttpMethod::GET),
            Err(RunnerError::ExecutorFailed { name, .. }) if name == "broken"
        ));

        let executor = Executor {
            name: "unknown",
            source: "url = helper()\n",
        };
        assert!(matches!(
            plan(&executor, HttpMethod::GET),
            Err(RunnerError::ExecutorFailed { .. })
        ));
    }
}
