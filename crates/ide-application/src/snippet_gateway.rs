//! Snippet sharing gateway: create, list, fetch and delete backend snippets.

use crate::session_store::{RequestOptions, SessionStore};
use ide_core::session::{HttpResponse, User};
use ide_core::snippet::{NewSnippet, Snippet, decode_envelope};
use ide_core::{IdeError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const SNIPPETS_PATH: &str = "/api/snippets";

const TITLE_REQUIRED_MESSAGE: &str = "Title is required";
const NOT_JSON_MESSAGE: &str = "Server did not return JSON";

fn snippet_path(id: &str) -> String {
    format!("{SNIPPETS_PATH}/{id}")
}

/// Snippet operations, gated by the session where the backend requires one.
pub struct SnippetGateway {
    session: Arc<SessionStore>,
}

impl SnippetGateway {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Shares `code` as a new snippet.
    ///
    /// The title is checked before the session, and both before any request.
    pub async fn share(&self, title: &str, language: &str, code: &str) -> Result<Snippet> {
        let title = title.trim();
        if title.is_empty() {
            return Err(IdeError::validation(TITLE_REQUIRED_MESSAGE));
        }
        let user = self.require_user().await?;

        let body = serde_json::to_value(NewSnippet {
            title: title.to_string(),
            language: language.to_string(),
            code: code.to_string(),
            user: user.name,
        })?;

        let response = self
            .session
            .authorized_request(SNIPPETS_PATH, RequestOptions::post(body))
            .await
            .map_err(|e| with_context(e, "Failed to create snippet"))?;

        let snippet: Snippet = decode_json(&response)?;
        tracing::info!("Shared snippet {} ({})", snippet.id, snippet.language);
        Ok(snippet)
    }

    /// Fetches every snippet. Each call issues a fresh request.
    pub async fn list(&self) -> Result<Vec<Snippet>> {
        let response = self
            .session
            .authorized_request(SNIPPETS_PATH, RequestOptions::get())
            .await
            .map_err(|e| with_context(e, "Failed to fetch snippets"))?;
        let snippets: Vec<Snippet> = decode_json(&response)?;
        tracing::debug!("Fetched {} snippet(s)", snippets.len());
        Ok(snippets)
    }

    pub async fn get(&self, id: &str) -> Result<Snippet> {
        let response = self
            .session
            .authorized_request(&snippet_path(id), RequestOptions::get())
            .await
            .map_err(|e| with_context(e, "Failed to fetch snippet"))?;
        decode_json(&response)
    }

    /// True when the signed-in user authored `snippet`.
    ///
    /// Client-side only; the backend enforces ownership itself.
    pub async fn can_delete(&self, snippet: &Snippet) -> bool {
        match self.session.current_user().await {
            Some(user) => is_author(&user, snippet),
            None => false,
        }
    }

    /// Deletes a snippet authored by the signed-in user.
    pub async fn delete(&self, snippet: &Snippet) -> Result<()> {
        let user = self.require_user().await?;
        if !is_author(&user, snippet) {
            return Err(IdeError::Forbidden(format!(
                "snippet {} belongs to another user",
                snippet.id
            )));
        }

        let response = self
            .session
            .authorized_request(&snippet_path(&snippet.id), RequestOptions::delete())
            .await
            .map_err(|e| with_context(e, "Failed to delete snippet"))?;

        // An empty acknowledgement is fine; a body must be JSON.
        if !response.body.trim().is_empty() && !response.is_json() {
            return Err(IdeError::InvalidContentType(NOT_JSON_MESSAGE.to_string()));
        }
        tracing::info!("Deleted snippet {}", snippet.id);
        Ok(())
    }

    async fn require_user(&self) -> Result<User> {
        self.session
            .current_user()
            .await
            .ok_or(IdeError::SignInRequired)
    }
}

fn is_author(user: &User, snippet: &Snippet) -> bool {
    snippet.author_id.as_deref() == Some(user.id.as_str())
}

fn with_context(err: IdeError, context: &str) -> IdeError {
    match err {
        IdeError::Http { status, message } => IdeError::Http {
            status,
            message: format!("{context}: {message}"),
        },
        other => other,
    }
}

fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    if !response.is_json() {
        return Err(IdeError::InvalidContentType(NOT_JSON_MESSAGE.to_string()));
    }
    Ok(decode_envelope(&response.body)?)
}
