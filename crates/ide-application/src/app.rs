//! Application root: composes the stores and services.

use crate::editor_session::EditorSession;
use crate::execution_orchestrator::ExecutionOrchestrator;
use crate::preference_store::PreferenceStore;
use crate::session_store::SessionStore;
use crate::snippet_gateway::SnippetGateway;
use ide_core::config::IdeConfig;
use ide_core::execution::{ExecutionApi, ExecutionResult};
use ide_core::language::{default_language, find_language};
use ide_core::session::HttpTransport;
use ide_core::snippet::Snippet;
use ide_core::storage::KeyValueStore;
use ide_core::Result;
use std::sync::Arc;

/// Every component, wired through constructor parameters.
///
/// Preferences are read first so the editor opens on the persisted language.
pub struct IdeApp {
    session: Arc<SessionStore>,
    editor: Arc<EditorSession>,
    orchestrator: Arc<ExecutionOrchestrator>,
    preferences: PreferenceStore,
    snippets: SnippetGateway,
}

impl IdeApp {
    pub async fn new(
        config: &IdeConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn HttpTransport>,
        execution_api: Arc<dyn ExecutionApi>,
    ) -> Result<Self> {
        let session = Arc::new(
            SessionStore::with_timeouts(
                transport,
                store.clone(),
                config.request_timeout(),
                config.logout_timeout(),
            )
            .await,
        );

        let preference = PreferenceStore::load_preference(store.as_ref()).await;
        let language = find_language(&preference.language).unwrap_or_else(default_language);
        let editor = Arc::new(EditorSession::open(store.clone(), language).await?);
        let orchestrator = Arc::new(ExecutionOrchestrator::with_timeout(
            execution_api,
            config.execution_timeout(),
        ));
        let preferences =
            PreferenceStore::new(store, preference, editor.clone(), orchestrator.clone());
        let snippets = SnippetGateway::new(session.clone());

        tracing::debug!("IDE ready: language={}", language.id);
        Ok(Self {
            session,
            editor,
            orchestrator,
            preferences,
            snippets,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    pub fn orchestrator(&self) -> &ExecutionOrchestrator {
        &self.orchestrator
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn snippets(&self) -> &SnippetGateway {
        &self.snippets
    }

    /// Runs the editor buffer in the active language.
    pub async fn run(&self) -> Result<ExecutionResult> {
        let code = self.editor.code().await;
        let language = self.editor.language().await;
        self.orchestrator.run(&code, language).await
    }

    /// Shares the editor buffer under `title`.
    pub async fn share(&self, title: &str) -> Result<Snippet> {
        self.editor.flush().await?;
        let code = self.editor.code().await;
        let language = self.editor.language().await;
        self.snippets.share(title, language.id, &code).await
    }

    /// Cancels in-flight requests and persists the editor buffer.
    pub async fn shutdown(&self) -> Result<()> {
        self.session.cancel_all();
        self.editor.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockExecutionApi, MockTransport, json_response};
    use ide_core::session::HttpMethod;
    use ide_core::storage::{AUTH_KEY, LANGUAGE_KEY, code_key};
    use ide_infrastructure::MemoryKeyValueStore;
    use serde_json::json;

    async fn app(
        store: Arc<MemoryKeyValueStore>,
    ) -> (IdeApp, Arc<MockTransport>, Arc<MockExecutionApi>) {
        let transport = Arc::new(MockTransport::new());
        let api = Arc::new(MockExecutionApi::new());
        let app = IdeApp::new(&IdeConfig::default(), store, transport.clone(), api.clone())
            .await
            .unwrap();
        (app, transport, api)
    }

    #[tokio::test]
    async fn test_opens_on_persisted_language() {
        let store = Arc::new(MemoryKeyValueStore::with_entries([
            (LANGUAGE_KEY, "ruby"),
            ("editor-code-ruby", "puts 'hi'"),
        ]));
        let (app, _, _) = app(store).await;

        assert_eq!(app.editor().language().await.id, "ruby");
        assert_eq!(app.editor().code().await, "puts 'hi'");
        assert_eq!(app.preferences().language().await.id, "ruby");
    }

    #[tokio::test]
    async fn test_run_uses_editor_buffer_and_language() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let (app, _, api) = app(store).await;
        app.preferences().set_language("go").await.unwrap();
        api.respond_json(r#"{"run":{"code":0,"output":"ok\n"}}"#);

        let result = app.run().await.unwrap();

        assert_eq!(result.output, "ok");
        let request = &api.requests()[0];
        assert_eq!(request.language, "go");
        assert_eq!(request.files[0].content, find_language("go").unwrap().starter_code);
    }

    #[tokio::test]
    async fn test_share_flushes_and_posts_buffer() {
        let store = Arc::new(MemoryKeyValueStore::with_entries([(
            AUTH_KEY,
            r#"{"id":"u1","name":"Ada","email":"ada@example.com","token":"t-1"}"#,
        )]));
        let (app, transport, _) = app(store.clone()).await;
        app.editor().set_code("console.log(42)").await.unwrap();
        transport.on(
            HttpMethod::Post,
            "/api/snippets",
            Ok(json_response(
                201,
                json!({ "data": {
                    "_id": "s1", "title": "Answer", "language": "javascript",
                    "code": "console.log(42)", "userId": "u1", "user": "Ada"
                }}),
            )),
        );

        let snippet = app.share("Answer").await.unwrap();

        assert_eq!(snippet.code, "console.log(42)");
        assert_eq!(
            store.get(&code_key("javascript")).await.unwrap().as_deref(),
            Some("console.log(42)")
        );
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["language"], "javascript");
    }

    #[tokio::test]
    async fn test_shutdown_persists_buffer() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let (app, _, _) = app(store.clone()).await;
        app.editor().set_code("let x = 1;").await.unwrap();

        app.shutdown().await.unwrap();

        assert_eq!(app.session().in_flight_requests(), 0);
        assert_eq!(
            store.get(&code_key("javascript")).await.unwrap().as_deref(),
            Some("let x = 1;")
        );
    }
}
