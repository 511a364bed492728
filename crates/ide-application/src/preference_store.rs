//! Preference store: language, theme and font size.

use crate::editor_session::EditorSession;
use crate::execution_orchestrator::ExecutionOrchestrator;
use ide_core::language::{LanguageConfig, default_language, find_language};
use ide_core::preference::{DEFAULT_FONT_SIZE, Preference, clamp_font_size, parse_font_size};
use ide_core::storage::{FONT_SIZE_KEY, KeyValueStore, LANGUAGE_KEY, THEME_KEY};
use ide_core::theme::{Theme, resolve_theme};
use ide_core::{IdeError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Every change is persisted immediately under its own key.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    editor: Arc<EditorSession>,
    orchestrator: Arc<ExecutionOrchestrator>,
    state: RwLock<Preference>,
}

impl PreferenceStore {
    /// Reads persisted preferences, falling back to defaults for anything
    /// missing, unknown or unreadable.
    pub async fn load_preference(store: &dyn KeyValueStore) -> Preference {
        let read = |key: &'static str| async move {
            store.get(key).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to read {}: {}", key, e);
                None
            })
        };

        let language = read(LANGUAGE_KEY)
            .await
            .and_then(|id| find_language(&id))
            .unwrap_or_else(default_language);
        let theme = resolve_theme(read(THEME_KEY).await.as_deref().unwrap_or_default());
        let font_size = read(FONT_SIZE_KEY)
            .await
            .map(|raw| parse_font_size(&raw))
            .unwrap_or(DEFAULT_FONT_SIZE);

        Preference {
            language: language.id.to_string(),
            theme: theme.id.to_string(),
            font_size,
        }
    }

    pub fn new(
        store: Arc<dyn KeyValueStore>,
        preference: Preference,
        editor: Arc<EditorSession>,
        orchestrator: Arc<ExecutionOrchestrator>,
    ) -> Self {
        Self {
            store,
            editor,
            orchestrator,
            state: RwLock::new(preference),
        }
    }

    pub async fn preference(&self) -> Preference {
        self.state.read().await.clone()
    }

    pub async fn language(&self) -> &'static LanguageConfig {
        find_language(&self.state.read().await.language).unwrap_or_else(default_language)
    }

    pub async fn theme(&self) -> &'static Theme {
        resolve_theme(&self.state.read().await.theme)
    }

    pub async fn font_size(&self) -> u32 {
        self.state.read().await.font_size
    }

    /// Switches the active language.
    ///
    /// The outgoing buffer is persisted first and the incoming buffer is
    /// loaded before the new language is recorded, so a failure at any step
    /// leaves the preference and the editor on the same language.
    pub async fn set_language(&self, id: &str) -> Result<&'static LanguageConfig> {
        let language =
            find_language(id).ok_or_else(|| IdeError::validation(format!("Unsupported language: {id}")))?;

        let mut state = self.state.write().await;
        self.editor.flush().await?;
        let previous = self.editor.language().await;
        self.editor.load(language).await?;

        if let Err(e) = self.store.set(LANGUAGE_KEY, language.id.to_string()).await {
            if let Err(reload) = self.editor.load(previous).await {
                tracing::warn!("Failed to restore {} buffer: {}", previous.id, reload);
            }
            return Err(e);
        }
        state.language = language.id.to_string();
        self.orchestrator.clear_output().await;

        tracing::info!("Language set to {}", language.id);
        Ok(language)
    }

    /// Sets the theme. Unknown ids select the default theme.
    pub async fn set_theme(&self, id: &str) -> Result<&'static Theme> {
        let theme = resolve_theme(id);
        if theme.id != id {
            tracing::debug!("Unknown theme {:?}, using {}", id, theme.id);
        }

        let mut state = self.state.write().await;
        self.store.set(THEME_KEY, theme.id.to_string()).await?;
        state.theme = theme.id.to_string();
        Ok(theme)
    }

    /// Sets the font size, clamped to the supported range.
    pub async fn set_font_size(&self, size: i64) -> Result<u32> {
        let size = clamp_font_size(size);

        let mut state = self.state.write().await;
        self.store.set(FONT_SIZE_KEY, size.to_string()).await?;
        state.font_size = size;
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockExecutionApi;
    use ide_core::storage::code_key;
    use ide_infrastructure::MemoryKeyValueStore;

    struct Fixture {
        store: Arc<MemoryKeyValueStore>,
        editor: Arc<EditorSession>,
        api: Arc<MockExecutionApi>,
        orchestrator: Arc<ExecutionOrchestrator>,
        preferences: PreferenceStore,
    }

    async fn fixture(store: MemoryKeyValueStore) -> Fixture {
        let store = Arc::new(store);
        let preference = PreferenceStore::load_preference(store.as_ref()).await;
        let language = find_language(&preference.language).unwrap();
        let editor = Arc::new(EditorSession::open(store.clone(), language).await.unwrap());
        let api = Arc::new(MockExecutionApi::new());
        let orchestrator = Arc::new(ExecutionOrchestrator::new(api.clone()));
        let preferences =
            PreferenceStore::new(store.clone(), preference, editor.clone(), orchestrator.clone());
        Fixture {
            store,
            editor,
            api,
            orchestrator,
            preferences,
        }
    }

    #[tokio::test]
    async fn test_defaults() {
        let f = fixture(MemoryKeyValueStore::new()).await;
        let preference = f.preferences.preference().await;
        assert_eq!(preference, Preference::default());
        assert_eq!(preference.font_size, DEFAULT_FONT_SIZE);
    }

    #[tokio::test]
    async fn test_load_falls_back_for_unknown_values() {
        let f = fixture(MemoryKeyValueStore::with_entries([
            (LANGUAGE_KEY, "cobol"),
            (THEME_KEY, "neon"),
            (FONT_SIZE_KEY, "large"),
        ]))
        .await;
        assert_eq!(f.preferences.preference().await, Preference::default());
    }

    #[tokio::test]
    async fn test_load_reads_persisted_values() {
        let f = fixture(MemoryKeyValueStore::with_entries([
            (LANGUAGE_KEY, "go"),
            (THEME_KEY, "monokai"),
            (FONT_SIZE_KEY, "20"),
        ]))
        .await;
        assert_eq!(f.preferences.language().await.id, "go");
        assert_eq!(f.preferences.theme().await.id, "monokai");
        assert_eq!(f.preferences.font_size().await, 20);
        assert_eq!(f.editor.language().await.id, "go");
    }

    #[tokio::test]
    async fn test_font_size_is_clamped_and_persisted() {
        let f = fixture(MemoryKeyValueStore::new()).await;

        assert_eq!(f.preferences.set_font_size(5).await.unwrap(), 12);
        assert_eq!(f.store.get(FONT_SIZE_KEY).await.unwrap().as_deref(), Some("12"));

        assert_eq!(f.preferences.set_font_size(99).await.unwrap(), 24);
        assert_eq!(f.preferences.font_size().await, 24);
    }

    #[tokio::test]
    async fn test_unknown_theme_selects_default() {
        let f = fixture(MemoryKeyValueStore::new()).await;

        assert_eq!(f.preferences.set_theme("github-dark").await.unwrap().id, "github-dark");
        assert_eq!(f.preferences.set_theme("neon").await.unwrap().id, "vs-dark");
        assert_eq!(f.store.get(THEME_KEY).await.unwrap().as_deref(), Some("vs-dark"));
    }

    #[tokio::test]
    async fn test_unknown_language_is_rejected_without_side_effects() {
        let f = fixture(MemoryKeyValueStore::new()).await;
        f.editor.set_code("console.log(1)").await.unwrap();

        let err = f.preferences.set_language("cobol").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(f.preferences.language().await.id, "javascript");
        assert_eq!(f.editor.code().await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_language_round_trip_restores_buffer() {
        let f = fixture(MemoryKeyValueStore::new()).await;
        f.editor.set_code("console.log('mine')").await.unwrap();

        f.preferences.set_language("python").await.unwrap();
        assert_eq!(
            f.store.get(&code_key("javascript")).await.unwrap().as_deref(),
            Some("console.log('mine')")
        );
        assert_eq!(f.editor.code().await, find_language("python").unwrap().starter_code);
        assert_eq!(f.store.get(LANGUAGE_KEY).await.unwrap().as_deref(), Some("python"));

        f.editor.set_code("print('also mine')").await.unwrap();
        f.preferences.set_language("javascript").await.unwrap();
        assert_eq!(f.editor.code().await, "console.log('mine')");

        f.preferences.set_language("python").await.unwrap();
        assert_eq!(f.editor.code().await, "print('also mine')");
    }

    #[tokio::test]
    async fn test_language_switch_clears_stale_output() {
        let f = fixture(MemoryKeyValueStore::new()).await;
        f.api.respond_json(r#"{"run":{"code":1,"stderr":"ReferenceError","output":""}}"#);
        let language = f.preferences.language().await;
        let _ = f.orchestrator.run("foo()", language).await;
        assert!(f.orchestrator.output().await.error.is_some());

        f.preferences.set_language("rust").await.unwrap();

        let output = f.orchestrator.output().await;
        assert_eq!(output.error, None);
        assert_eq!(output.output, "");
    }

    /// Fails reads and writes of one key, delegating everything else.
    struct FailingKeyStore {
        inner: MemoryKeyValueStore,
        failing: String,
    }

    impl FailingKeyStore {
        fn check(&self, key: &str) -> Result<()> {
            if key == self.failing {
                return Err(IdeError::storage(format!("{key} is unavailable")));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl KeyValueStore for FailingKeyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.check(key)?;
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            self.check(key)?;
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.check(key)?;
            self.inner.remove(key).await
        }
    }

    async fn failing_on(key: &str) -> (Arc<FailingKeyStore>, Arc<EditorSession>, PreferenceStore) {
        let store = Arc::new(FailingKeyStore {
            inner: MemoryKeyValueStore::new(),
            failing: key.to_string(),
        });
        let editor = Arc::new(EditorSession::open(store.clone(), default_language()).await.unwrap());
        let orchestrator = Arc::new(ExecutionOrchestrator::new(Arc::new(MockExecutionApi::new())));
        let preferences =
            PreferenceStore::new(store.clone(), Preference::default(), editor.clone(), orchestrator);
        (store, editor, preferences)
    }

    #[tokio::test]
    async fn test_unreadable_buffer_keeps_current_language() {
        let (store, editor, preferences) = failing_on(&code_key("python")).await;
        editor.set_code("console.log('mine')").await.unwrap();

        let err = preferences.set_language("python").await.unwrap_err();

        assert!(matches!(err, IdeError::Storage(_)));
        assert_eq!(preferences.language().await.id, "javascript");
        assert_eq!(editor.language().await.id, "javascript");
        assert_eq!(editor.code().await, "console.log('mine')");
        assert_eq!(store.get(LANGUAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unsaved_language_restores_previous_buffer() {
        let (_store, editor, preferences) = failing_on(LANGUAGE_KEY).await;
        editor.set_code("console.log('mine')").await.unwrap();

        let err = preferences.set_language("go").await.unwrap_err();

        assert!(matches!(err, IdeError::Storage(_)));
        assert_eq!(preferences.language().await.id, "javascript");
        assert_eq!(editor.language().await.id, "javascript");
        assert_eq!(editor.code().await, "console.log('mine')");
    }
}
