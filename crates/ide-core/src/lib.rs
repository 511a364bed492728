pub mod config;
pub mod error;
pub mod execution;
pub mod language;
pub mod notice;
pub mod preference;
pub mod session;
pub mod snippet;
pub mod storage;
pub mod theme;

// Re-export common error type
pub use error::{IdeError, Result};
