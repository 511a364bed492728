//! ReqwestTransport - HTTP transport for the backend REST API.

use crate::piston_client::map_send_error;
use async_trait::async_trait;
use ide_core::session::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use ide_core::{IdeError, Result};
use reqwest::{Client, Method, header};

/// [`HttpTransport`] that resolves request paths against a base URL.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.url_for(&request.path);
        tracing::debug!("{} {}", request.method.as_str(), url);

        let mut builder = self
            .client
            .request(to_method(request.method), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|err| IdeError::network(format!("Failed to read response body: {err}")))?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
