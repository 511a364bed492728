//! Scripted fakes for the HTTP and execution seams.

use async_trait::async_trait;
use ide_core::execution::{ExecuteRequest, ExecuteResponse, ExecutionApi};
use ide_core::session::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use ide_core::{IdeError, Result};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("application/json; charset=utf-8".to_string()),
        body: body.to_string(),
    }
}

pub fn html_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("text/html".to_string()),
        body: body.to_string(),
    }
}

struct Scripted {
    delay: Option<Duration>,
    response: Result<HttpResponse>,
}

/// Transport answering from per-route queues. Unscripted routes get a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn route_key(method: HttpMethod, path: &str) -> String {
    format!("{} {}", method.as_str(), path)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: HttpMethod, path: &str, response: Result<HttpResponse>) {
        self.push(method, path, None, response);
    }

    pub fn on_delayed(
        &self,
        method: HttpMethod,
        path: &str,
        delay: Duration,
        response: Result<HttpResponse>,
    ) {
        self.push(method, path, Some(delay), response);
    }

    fn push(
        &self,
        method: HttpMethod,
        path: &str,
        delay: Option<Duration>,
        response: Result<HttpResponse>,
    ) {
        self.routes
            .lock()
            .unwrap()
            .entry(route_key(method, path))
            .or_default()
            .push_back(Scripted { delay, response });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let key = route_key(request.method, &request.path);
        self.requests.lock().unwrap().push(request);

        let scripted = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted { delay, response }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            None => Ok(json_response(404, serde_json::json!({ "message": "Not found" }))),
        }
    }
}

/// Execution API answering from a queue, recording every request.
#[derive(Default)]
pub struct MockExecutionApi {
    responses: Mutex<VecDeque<Result<ExecuteResponse>>>,
    requests: Mutex<Vec<ExecuteRequest>>,
    delay: Option<Duration>,
}

impl MockExecutionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Queues a response decoded from sandbox JSON.
    pub fn respond_json(&self, json: &str) {
        let response = serde_json::from_str(json).expect("valid sandbox response");
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn fail(&self, err: IdeError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ExecuteRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ExecutionApi for MockExecutionApi {
    async fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(IdeError::network("no scripted response")))
    }
}
