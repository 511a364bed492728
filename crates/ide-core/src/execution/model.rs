//! Execution wire format and result interpretation.

use serde::{Deserialize, Serialize};

use crate::error::ExecutionFailure;
use crate::language::Runtime;

/// Request body for the execution sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecuteRequest {
    pub language: String,
    pub version: String,
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub content: String,
}

impl ExecuteRequest {
    /// Builds a single-file request for `runtime`.
    pub fn new(runtime: &Runtime, code: impl Into<String>) -> Self {
        Self {
            language: runtime.language.to_string(),
            version: runtime.version.to_string(),
            files: vec![SourceFile {
                content: code.into(),
            }],
        }
    }
}

/// One stage (compile or run) of a sandbox response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StageOutput {
    /// Exit status; `None` when the process was killed by a signal
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    /// Interleaved stdout and stderr
    #[serde(default)]
    pub output: String,
}

impl StageOutput {
    fn failed(&self) -> bool {
        self.code != Some(0)
    }

    fn error_text(&self) -> String {
        if self.stderr.is_empty() {
            self.output.clone()
        } else {
            self.stderr.clone()
        }
    }
}

/// Response body from the execution sandbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecuteResponse {
    /// Present when the request itself was rejected
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub compile: Option<StageOutput>,
    #[serde(default)]
    pub run: Option<StageOutput>,
}

impl ExecuteResponse {
    /// Decides the outcome of a run.
    ///
    /// Checked in order: request-level `message`, failed compile stage,
    /// failed run stage. Otherwise the run output, trimmed.
    pub fn interpret(&self) -> Result<String, ExecutionFailure> {
        if let Some(message) = &self.message {
            return Err(ExecutionFailure::Request(message.clone()));
        }

        if let Some(compile) = &self.compile
            && compile.failed()
        {
            return Err(ExecutionFailure::Compile(compile.error_text()));
        }

        let run = self.run.as_ref().ok_or(ExecutionFailure::Transport)?;
        if run.failed() {
            return Err(ExecutionFailure::Runtime(run.error_text()));
        }

        Ok(run.output.trim().to_string())
    }
}

/// Outcome of the most recent run, kept for display until the next run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The code that was submitted
    pub code: String,
    pub output: String,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn succeeded(code: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(code: impl Into<String>, failure: &ExecutionFailure) -> Self {
        Self {
            code: code.into(),
            output: String::new(),
            error: Some(failure.message()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
