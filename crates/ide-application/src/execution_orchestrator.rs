//! Execution orchestrator: runs code in the remote sandbox, one run at a time.
//!
//! ```text
//! Idle --run(non-empty)--> Running --response--> Succeeded | Failed --> Idle
//! Idle --run(empty)------> Idle (validation error, no network call)
//! Running --run()--------> rejected with IdeError::Busy
//! ```

use ide_core::error::ExecutionFailure;
use ide_core::execution::{ExecuteRequest, ExecutionApi, ExecutionResult};
use ide_core::language::LanguageConfig;
use ide_core::{IdeError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

pub const EMPTY_CODE_MESSAGE: &str = "Please enter some code";
pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    Idle,
    Running,
}

/// What the output panel shows. Replaced as a whole on every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputState {
    pub output: String,
    pub error: Option<String>,
    /// Outcome of the most recent completed run
    pub last_result: Option<ExecutionResult>,
}

/// Holds the running flag for the lifetime of one run.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ExecutionOrchestrator {
    api: Arc<dyn ExecutionApi>,
    timeout: Duration,
    running: AtomicBool,
    state: RwLock<OutputState>,
}

impl ExecutionOrchestrator {
    pub fn new(api: Arc<dyn ExecutionApi>) -> Self {
        Self::with_timeout(api, DEFAULT_EXECUTION_TIMEOUT)
    }

    pub fn with_timeout(api: Arc<dyn ExecutionApi>, timeout: Duration) -> Self {
        Self {
            api,
            timeout,
            running: AtomicBool::new(false),
            state: RwLock::new(OutputState::default()),
        }
    }

    pub fn phase(&self) -> RunPhase {
        if self.is_running() {
            RunPhase::Running
        } else {
            RunPhase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub async fn output(&self) -> OutputState {
        self.state.read().await.clone()
    }

    pub async fn last_result(&self) -> Option<ExecutionResult> {
        self.state.read().await.last_result.clone()
    }

    /// Clears output and error, keeping the last result.
    pub async fn clear_output(&self) {
        let mut state = self.state.write().await;
        state.output.clear();
        state.error = None;
    }

    /// Runs `code` with the runtime of `language`.
    ///
    /// Returns the successful result, or `IdeError::Execution` after a failed
    /// run; either way the output state and last result are updated in one
    /// step. Empty code and overlapping runs are rejected without a network call.
    pub async fn run(&self, code: &str, language: &LanguageConfig) -> Result<ExecutionResult> {
        self.run_with_cancel(code, language, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), aborting quietly when `cancel` fires.
    ///
    /// A cancelled run puts back the output panel as it was before the run.
    pub async fn run_with_cancel(
        &self,
        code: &str,
        language: &LanguageConfig,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        if code.trim().is_empty() {
            // The in-flight run owns the output panel.
            if let Some(_guard) = RunGuard::acquire(&self.running) {
                self.state.write().await.error = Some(EMPTY_CODE_MESSAGE.to_string());
            }
            return Err(IdeError::validation(EMPTY_CODE_MESSAGE));
        }

        let Some(_guard) = RunGuard::acquire(&self.running) else {
            tracing::debug!("Run rejected: another run is in flight");
            return Err(IdeError::Busy);
        };

        let previous = {
            let mut state = self.state.write().await;
            let previous = state.clone();
            state.output.clear();
            state.error = None;
            previous
        };

        let request = ExecuteRequest::new(&language.runtime, code);
        tracing::info!(
            "Running {} code on {} {}",
            language.id,
            request.language,
            request.version
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Run cancelled");
                *self.state.write().await = previous;
                return Err(IdeError::Cancelled);
            }
            response = tokio::time::timeout(self.timeout, self.api.execute(&request)) => {
                response.unwrap_or(Err(IdeError::Timeout))
            }
        };

        let verdict: std::result::Result<String, ExecutionFailure> = match response {
            Ok(response) => response.interpret(),
            Err(e) => {
                tracing::warn!("Execution request failed: {}", e);
                Err(ExecutionFailure::Transport)
            }
        };

        let result = match &verdict {
            Ok(output) => ExecutionResult::succeeded(code, output.as_str()),
            Err(failure) => ExecutionResult::failed(code, failure),
        };

        *self.state.write().await = OutputState {
            output: result.output.clone(),
            error: result.error.clone(),
            last_result: Some(result.clone()),
        };

        match verdict {
            Ok(_) => Ok(result),
            Err(failure) => {
                tracing::debug!("Run failed: {:?}", failure);
                Err(failure.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockExecutionApi;
    use ide_core::language::find_language;

    fn python() -> &'static LanguageConfig {
        find_language("python").unwrap()
    }

    fn orchestrator(api: Arc<MockExecutionApi>) -> ExecutionOrchestrator {
        ExecutionOrchestrator::new(api)
    }

    #[tokio::test]
    async fn test_empty_code_never_calls_network() {
        let api = Arc::new(MockExecutionApi::new());
        let orchestrator = orchestrator(api.clone());

        for code in ["", "   ", "\n\t  \n"] {
            let err = orchestrator.run(code, python()).await.unwrap_err();
            assert!(err.is_validation());
        }

        assert_eq!(api.call_count(), 0);
        assert_eq!(orchestrator.phase(), RunPhase::Idle);
        let output = orchestrator.output().await;
        assert_eq!(output.error.as_deref(), Some(EMPTY_CODE_MESSAGE));
        assert_eq!(output.last_result, None);
    }

    #[tokio::test]
    async fn test_success_output_is_trimmed() {
        let api = Arc::new(MockExecutionApi::new());
        api.respond_json(r#"{"compile":{"code":0,"output":""},"run":{"code":0,"output":"hello\n"}}"#);
        let orchestrator = orchestrator(api.clone());

        let result = orchestrator.run("print('hello')", python()).await.unwrap();

        assert_eq!(result.output, "hello");
        assert_eq!(result.error, None);
        let output = orchestrator.output().await;
        assert_eq!(output.output, "hello");
        assert_eq!(output.last_result, Some(result));

        let request = &api.requests()[0];
        assert_eq!(request.language, "python");
        assert_eq!(request.version, "3.10.0");
        assert_eq!(request.files[0].content, "print('hello')");
    }

    #[tokio::test]
    async fn test_compile_error() {
        let api = Arc::new(MockExecutionApi::new());
        api.respond_json(r#"{"compile":{"code":2,"stderr":"syntax error","output":""}}"#);
        let orchestrator = orchestrator(api);

        let err = orchestrator.run("def (", python()).await.unwrap_err();

        assert!(matches!(
            err,
            IdeError::Execution(ExecutionFailure::Compile(ref msg)) if msg == "syntax error"
        ));
        let output = orchestrator.output().await;
        assert_eq!(output.error.as_deref(), Some("syntax error"));
        assert_eq!(output.output, "");
        assert_eq!(
            output.last_result.unwrap().error.as_deref(),
            Some("syntax error")
        );
        assert_eq!(orchestrator.phase(), RunPhase::Idle);
    }

    #[tokio::test]
    async fn test_request_level_message() {
        let api = Arc::new(MockExecutionApi::new());
        api.respond_json(r#"{"message":"python-9.9 runtime is unknown"}"#);
        let orchestrator = orchestrator(api);

        let err = orchestrator.run("print(1)", python()).await.unwrap_err();
        assert_eq!(err.to_string(), "python-9.9 runtime is unknown");
    }

    #[tokio::test]
    async fn test_network_failure_is_generic() {
        let api = Arc::new(MockExecutionApi::new());
        api.fail(IdeError::network("connection reset"));
        let orchestrator = orchestrator(api.clone());

        let err = orchestrator.run("print(1)", python()).await.unwrap_err();

        assert!(matches!(err, IdeError::Execution(ExecutionFailure::Transport)));
        assert_eq!(
            orchestrator.output().await.error.as_deref(),
            Some("Error running code")
        );
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_while_running_is_rejected() {
        let api = Arc::new(MockExecutionApi::with_delay(Duration::from_secs(2)));
        api.respond_json(r#"{"run":{"code":0,"output":"1"}}"#);
        let orchestrator = orchestrator(api.clone());

        let first = orchestrator.run("print(1)", python());
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(orchestrator.phase(), RunPhase::Running);
            orchestrator.run("print(2)", python()).await
        };
        let empty = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            orchestrator.run("  ", python()).await
        };
        let (first, second, empty) = tokio::join!(first, second, empty);

        assert_eq!(first.unwrap().output, "1");
        assert!(matches!(second, Err(IdeError::Busy)));
        assert!(empty.unwrap_err().is_validation());
        assert_eq!(api.call_count(), 1);
        assert_eq!(orchestrator.output().await.error, None);
        assert_eq!(orchestrator.phase(), RunPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_generically() {
        let api = Arc::new(MockExecutionApi::with_delay(Duration::from_secs(120)));
        api.respond_json(r#"{"run":{"code":0,"output":"late"}}"#);
        let orchestrator = ExecutionOrchestrator::with_timeout(api, Duration::from_secs(10));

        let err = orchestrator.run("print(1)", python()).await.unwrap_err();
        assert!(matches!(err, IdeError::Execution(ExecutionFailure::Transport)));
        assert!(!orchestrator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_keeps_previous_result() {
        let api = Arc::new(MockExecutionApi::new());
        api.respond_json(r#"{"run":{"code":0,"output":"first"}}"#);
        let orchestrator = orchestrator(api);
        let previous = orchestrator.run("print('first')", python()).await.unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = orchestrator
            .run_with_cancel("print('second')", python(), &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(orchestrator.output().await.output, "first");
        assert_eq!(orchestrator.last_result().await, Some(previous));
        assert!(!orchestrator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_run_restores_output() {
        let api = Arc::new(MockExecutionApi::with_delay(Duration::from_secs(2)));
        api.respond_json(r#"{"run":{"code":0,"output":"first"}}"#);
        let orchestrator = orchestrator(api.clone());
        let previous = orchestrator.run("print('first')", python()).await.unwrap();

        let cancel = CancellationToken::new();
        let run = orchestrator.run_with_cancel("print('second')", python(), &cancel);
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(orchestrator.output().await.output, "");
            cancel.cancel();
        };
        let (result, ()) = tokio::join!(run, canceller);

        assert!(result.unwrap_err().is_cancelled());
        let output = orchestrator.output().await;
        assert_eq!(output.output, "first");
        assert_eq!(output.error, None);
        assert_eq!(output.last_result, Some(previous));
        assert_eq!(api.call_count(), 2);
        assert!(!orchestrator.is_running());
    }
}
