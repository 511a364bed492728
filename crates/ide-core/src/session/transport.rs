//! HTTP transport seam for the backend REST API.
//!
//! The session store decides *what* to send (bearer token, timeout,
//! cancellation); an [`HttpTransport`] only moves bytes.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A request against the backend, relative to its base URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path starting with `/`, e.g. `/api/snippets`
    pub path: String,
    pub body: Option<Value>,
    pub bearer_token: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer_token: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully received response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// The non-empty JSON `message` field of the body, if any.
    pub fn body_message(&self) -> Option<String> {
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|msg| !msg.trim().is_empty())
    }

    /// Human-readable error text for a failed response.
    ///
    /// Uses the JSON `message` field when the body carries one, otherwise a
    /// status-based message.
    pub fn error_message(&self) -> String {
        self.body_message()
            .unwrap_or_else(|| format!("Request failed with status {}", self.status))
    }
}

/// Sends a single request and returns the full response.
///
/// Non-2xx responses are returned as `Ok`; only transport failures are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
