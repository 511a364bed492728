//! User-facing notifications.
//!
//! Failures never stop the client; they are turned into a non-blocking
//! notice and the originating component returns to idle.

use serde::Serialize;

use crate::error::IdeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Notice for a failure, or `None` when the failure was an intentional cancellation.
    pub fn from_error(err: &IdeError) -> Option<Self> {
        match err {
            IdeError::Cancelled => None,
            IdeError::SignInRequired => Some(Self::warning(err.to_string())),
            IdeError::Timeout | IdeError::Network(_) => {
                Some(Self::warning(format!("{err}. Please try again.")))
            }
            _ => Some(Self::error(err.to_string())),
        }
    }
}
