//! Execution sandbox seam.

use async_trait::async_trait;

use super::model::{ExecuteRequest, ExecuteResponse};
use crate::error::Result;

/// Submits code to a remote execution sandbox.
///
/// Implementations return the decoded response body whatever the HTTP status;
/// the caller interprets it. Transport and decoding failures are errors.
#[async_trait]
pub trait ExecutionApi: Send + Sync {
    async fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse>;
}
