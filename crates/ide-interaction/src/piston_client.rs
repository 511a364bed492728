//! PistonClient - REST client for the Piston code execution sandbox.

use async_trait::async_trait;
use ide_core::config::DEFAULT_EXECUTION_URL;
use ide_core::execution::{ExecuteRequest, ExecuteResponse, ExecutionApi};
use ide_core::{IdeError, Result};
use reqwest::Client;

/// [`ExecutionApi`] backed by a Piston `execute` endpoint.
#[derive(Clone)]
pub struct PistonClient {
    client: Client,
    url: String,
}

impl PistonClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Reuses an existing HTTP client (connection pool).
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for PistonClient {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTION_URL)
    }
}

#[async_trait]
impl ExecutionApi for PistonClient {
    async fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse> {
        tracing::debug!(
            "Submitting {} {} run to {}",
            request.language,
            request.version,
            self.url
        );

        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        // Piston reports rejected requests (unknown runtime, etc.) as a JSON
        // body with a `message` field and a 4xx status, so the body is decoded
        // regardless of status and interpreted by the caller.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| IdeError::network(format!("Failed to read Piston response: {err}")))?;

        decode_response(status.as_u16(), &body)
    }
}

fn decode_response(status: u16, body: &str) -> Result<ExecuteResponse> {
    serde_json::from_str::<ExecuteResponse>(body).map_err(|err| {
        tracing::warn!("Undecodable Piston response (status {}): {}", status, err);
        IdeError::from(err)
    })
}

pub(crate) fn map_send_error(err: reqwest::Error) -> IdeError {
    if err.is_timeout() {
        IdeError::Timeout
    } else {
        IdeError::network(err.to_string())
    }
}
