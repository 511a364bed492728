//! Persistent key/value storage seam.
//!
//! Every component that persists state does so through [`KeyValueStore`],
//! so the backing store can be a file on disk or an in-memory fake in tests.
//! Writes are "last writer wins" per key; keys are scoped per component.

use async_trait::async_trait;

use crate::error::Result;

/// Key holding the JSON-encoded signed-in user.
pub const AUTH_KEY: &str = "auth";
/// Key holding the selected language id.
pub const LANGUAGE_KEY: &str = "editor-language";
/// Key holding the selected theme id.
pub const THEME_KEY: &str = "editor-theme";
/// Key holding the editor font size.
pub const FONT_SIZE_KEY: &str = "editor-font-size";

const CODE_KEY_PREFIX: &str = "editor-code-";

/// Key holding the persisted code buffer for `language_id`.
pub fn code_key(language_id: &str) -> String {
    format!("{CODE_KEY_PREFIX}{language_id}")
}

/// String key/value store with explicit get/set/remove.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
