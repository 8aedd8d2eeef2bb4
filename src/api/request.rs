use std::fmt;

use serde_json::Value;
use uuid::Uuid;

pub const ACCEPT: &str = "Accept";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
const JSON_MIME: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call as the caller describes it.
///
/// Unset `origin` and `retry_budget` are filled from the client's
/// configuration when the call is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub request_id: Uuid,
    pub origin: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub retry_budget: Option<u32>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            origin: None,
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            retry_budget: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a caller header. Caller headers override the defaults.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = Some(retry_budget);
        self
    }

    /// The same call with one less retry left.
    pub(crate) fn retried(&self) -> Self {
        Self {
            retry_budget: Some(self.retry_budget.unwrap_or(0).saturating_sub(1)),
            ..self.clone()
        }
    }

    /// POST always carries a body, `{}` when none was given. GET never does.
    pub(crate) fn encoded_body(&self) -> Option<String> {
        match self.method {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(
                self.body
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| "{}".to_string()),
            ),
        }
    }
}

/// A fully resolved request as handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub request_id: Uuid,
    pub method: HttpMethod,
    pub url: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl OutgoingRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.header(AUTHORIZATION)
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

pub(crate) fn json_headers() -> Vec<(String, String)> {
    vec![
        (ACCEPT.to_string(), JSON_MIME.to_string()),
        (CONTENT_TYPE.to_string(), JSON_MIME.to_string()),
    ]
}

/// Set `name`, replacing any existing header with the same name regardless
/// of case.
pub(crate) fn overlay_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}
