use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::TIMESTAMP_FORMAT;
use crate::error::RunnerError;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }

    /// Methods that conventionally carry a JSON body
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::POST | HttpMethod::PUT | HttpMethod::PATCH)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            _ => Err(RunnerError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Which header carries the credential
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthHeaderStyle {
    /// `Authorization: <key>`
    #[default]
    Authorization,
    /// Legacy `X-API-Key: <key>` variant
    XApiKey,
}

impl AuthHeaderStyle {
    pub fn header_name(&self) -> &'static str {
        match self {
            AuthHeaderStyle::Authorization => "Authorization",
            AuthHeaderStyle::XApiKey => "X-API-Key",
        }
    }
}

/// Fully resolved outbound request
#[derive(Clone, Debug, PartialEq)]
pub struct RequestPlan {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestPlan {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response body, decoded as JSON when possible
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Body kind label for display
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Text,
}

impl BodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Json => "json",
            BodyKind::Text => "text",
        }
    }
}

impl ResponseBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(json) => ResponseBody::Json(json),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            ResponseBody::Json(_) => BodyKind::Json,
            ResponseBody::Text(_) => BodyKind::Text,
        }
    }

    /// Pretty JSON, or the raw text
    pub fn render(&self) -> String {
        match self {
            ResponseBody::Json(json) => {
                serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
            }
            ResponseBody::Text(text) => text.clone(),
        }
    }

    /// Rendered body cut to `limit` characters
    pub fn preview(&self, limit: usize) -> String {
        truncate_chars(&self.render(), limit).to_string()
    }
}

/// Outcome of one executed request
#[derive(Clone, Debug)]
pub struct RequestResult {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub elapsed: Duration,
    pub body: ResponseBody,
    pub timestamp: DateTime<Local>,
}

impl RequestResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_kind(&self) -> BodyKind {
        self.body.kind()
    }

    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Cut `text` to at most `limit` characters on a char boundary
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::PATCH);
        assert_eq!(
            "TRACE".parse::<HttpMethod>(),
            Err(RunnerError::UnsupportedMethod("TRACE".to_string()))
        );
        assert!(HttpMethod::PUT.has_body());
        assert!(!HttpMethod::DELETE.has_body());
        assert_eq!(format!("[{:6}]", HttpMethod::GET), "[GET   ]");
    }

    #[test]
    fn test_response_body_kind() {
        let json = ResponseBody::parse(r#"{"ok": true}"#.to_string());
        assert_eq!(json.kind(), BodyKind::Json);
        let text = ResponseBody::parse("id,name\n1,ACME".to_string());
        assert_eq!(text.kind(), BodyKind::Text);
        assert_eq!(text.preview(2), "id");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
