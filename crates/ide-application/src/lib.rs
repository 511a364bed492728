//! Application layer for the IDE client.
//!
//! Stateful components that sit between the domain models in `ide-core` and
//! the clients in `ide-interaction`:
//!
//! - [`SessionStore`]: signed-in user and authorized backend requests
//! - [`PreferenceStore`]: language, theme and font size
//! - [`EditorSession`]: the active code buffer
//! - [`ExecutionOrchestrator`]: single-flight code runs
//! - [`SnippetGateway`]: snippet sharing
//! - [`IdeApp`]: composes all of the above

pub mod app;
pub mod editor_session;
pub mod execution_orchestrator;
pub mod preference_store;
pub mod session_store;
pub mod snippet_gateway;

#[cfg(test)]
mod test_support;

pub use app::IdeApp;
pub use editor_session::EditorSession;
pub use execution_orchestrator::{ExecutionOrchestrator, OutputState, RunPhase};
pub use preference_store::PreferenceStore;
pub use session_store::{RequestOptions, SessionStore};
pub use snippet_gateway::SnippetGateway;
