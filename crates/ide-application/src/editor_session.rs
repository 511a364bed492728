//! The active code buffer and its per-language persistence.

use ide_core::Result;
use ide_core::language::LanguageConfig;
use ide_core::storage::{KeyValueStore, code_key};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Buffer {
    language: &'static LanguageConfig,
    code: String,
}

/// Holds the one buffer bound to the visible editor.
///
/// Buffers for other languages live only in storage under
/// `editor-code-<language>`; [`load`](Self::load) swaps one in.
pub struct EditorSession {
    store: Arc<dyn KeyValueStore>,
    buffer: RwLock<Buffer>,
}

impl EditorSession {
    /// Opens the editor on `language`, loading its persisted buffer or starter code.
    pub async fn open(store: Arc<dyn KeyValueStore>, language: &'static LanguageConfig) -> Result<Self> {
        let code = load_buffer(store.as_ref(), language).await?;
        Ok(Self {
            store,
            buffer: RwLock::new(Buffer { language, code }),
        })
    }

    pub async fn code(&self) -> String {
        self.buffer.read().await.code.clone()
    }

    pub async fn language(&self) -> &'static LanguageConfig {
        self.buffer.read().await.language
    }

    /// Replaces the buffer text. Non-empty text is persisted immediately.
    pub async fn set_code(&self, code: impl Into<String>) -> Result<()> {
        let mut buffer = self.buffer.write().await;
        buffer.code = code.into();
        if !buffer.code.is_empty() {
            self.store
                .set(&code_key(buffer.language.id), buffer.code.clone())
                .await?;
        }
        Ok(())
    }

    /// Persists the buffer under its language key. Empty buffers are not written.
    pub async fn flush(&self) -> Result<()> {
        let buffer = self.buffer.read().await;
        if buffer.code.is_empty() {
            return Ok(());
        }
        self.store
            .set(&code_key(buffer.language.id), buffer.code.clone())
            .await
    }

    /// Binds the editor to `language`, replacing the buffer with its persisted
    /// text or starter code. Does not flush the outgoing buffer.
    pub async fn load(&self, language: &'static LanguageConfig) -> Result<()> {
        let code = load_buffer(self.store.as_ref(), language).await?;
        let mut buffer = self.buffer.write().await;
        buffer.language = language;
        buffer.code = code;
        tracing::debug!("Editor bound to {}", language.id);
        Ok(())
    }

    /// Restores the starter code and forgets the persisted buffer.
    pub async fn reset(&self) -> Result<()> {
        let mut buffer = self.buffer.write().await;
        buffer.code = buffer.language.starter_code.to_string();
        self.store.remove(&code_key(buffer.language.id)).await
    }
}

async fn load_buffer(store: &dyn KeyValueStore, language: &LanguageConfig) -> Result<String> {
    let saved = store
        .get(&code_key(language.id))
        .await?
        .filter(|code| !code.is_empty());
    Ok(saved.unwrap_or_else(|| language.starter_code.to_string()))
}
