//! Snippet domain model.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A shared piece of code owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(default, alias = "userId")]
    pub author_id: Option<String>,
    #[serde(default, alias = "user")]
    pub author_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a snippet creation request.
#[derive(Debug, Clone, Serialize)]
pub struct NewSnippet {
    pub title: String,
    pub language: String,
    pub code: String,
    /// Display name of the author
    pub user: String,
}

/// Decodes a backend payload that may or may not be wrapped in `{ "data": ... }`.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            serde_json::from_value(data)
        }
        other => serde_json::from_value(other),
    }
}

/// Client-side narrowing of a snippet list.
#[derive(Debug, Clone, Default)]
pub struct SnippetFilter {
    /// Case-insensitive text matched against title, language and author name
    pub query: Option<String>,
    /// Exact language id
    pub language: Option<String>,
}

impl SnippetFilter {
    pub fn matches(&self, snippet: &Snippet) -> bool {
        let matches_query = match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                [&snippet.title, &snippet.language, &snippet.author_name]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            }
        };
        let matches_language = self
            .language
            .as_deref()
            .is_none_or(|lang| snippet.language == lang);

        matches_query && matches_language
    }

    pub fn apply<'a>(&self, snippets: &'a [Snippet]) -> Vec<&'a Snippet> {
        snippets.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Distinct languages in first-seen order, truncated to `limit`.
pub fn popular_languages(snippets: &[Snippet], limit: usize) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for snippet in snippets {
        if !languages.contains(&snippet.language) {
            languages.push(snippet.language.clone());
        }
    }
    languages.truncate(limit);
    languages
}
