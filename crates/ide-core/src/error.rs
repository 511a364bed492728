//! Error types for the IDE client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used whenever a run fails for a reason other than the sandbox's verdict.
pub const EXECUTION_FAILED_MESSAGE: &str = "Error running code";

/// How a code run failed.
///
/// The execution sandbox reports failures at three levels; anything that
/// prevents a usable response from arriving at all is `Transport`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionFailure {
    /// The request itself was refused (e.g. unsupported language or version).
    #[error("{0}")]
    Request(String),

    /// The program did not compile.
    #[error("{0}")]
    Compile(String),

    /// The program exited with a non-zero status.
    #[error("{0}")]
    Runtime(String),

    /// Network, timeout or decoding failure. Never retried automatically.
    #[error("Error running code")]
    Transport,
}

impl ExecutionFailure {
    /// Text shown to the user for this failure.
    pub fn message(&self) -> String {
        match self {
            Self::Request(msg) | Self::Compile(msg) | Self::Runtime(msg) => msg.clone(),
            Self::Transport => EXECUTION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// A shared error type for the whole IDE client.
///
/// Validation errors are raised before any network call; every other variant
/// is recoverable and leaves the originating component idle.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum IdeError {
    /// Local input validation failed (empty title, empty code, unknown language)
    #[error("{0}")]
    Validation(String),

    /// Bad credentials, expired session or malformed auth response
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Backend answered 2xx but not with JSON (proxy or backend misconfiguration)
    #[error("{0}")]
    InvalidContentType(String),

    /// A code run failed
    #[error("{0}")]
    Execution(ExecutionFailure),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The local timeout fired before the remote service answered
    #[error("Request timed out")]
    Timeout,

    /// The request was cancelled on purpose
    #[error("Request cancelled")]
    Cancelled,

    /// A run is already in flight
    #[error("Code is already running")]
    Busy,

    /// The action needs a signed-in session
    #[error("Sign in now and share snippets!")]
    SignInRequired,

    /// The signed-in user may not perform this action
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// Persistent key/value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IdeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this error was caused by an intentional cancellation.
    ///
    /// Cancelled requests must never surface a user-visible error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error is transient (network failure or timeout)
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<ExecutionFailure> for IdeError {
    fn from(failure: ExecutionFailure) -> Self {
        Self::Execution(failure)
    }
}

impl From<std::io::Error> for IdeError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for IdeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for IdeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, IdeError>`.
pub type Result<T> = std::result::Result<T, IdeError>;
