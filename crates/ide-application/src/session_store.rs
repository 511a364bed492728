//! Session store: the signed-in user and every authorized backend call.

use ide_core::session::{
    AuthResponse, Credentials, HttpMethod, HttpRequest, HttpResponse, HttpTransport, Session,
    SignupProfile, User,
};
use ide_core::storage::{AUTH_KEY, KeyValueStore};
use ide_core::{IdeError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);

const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";
const INVALID_AUTH_RESPONSE: &str = "Invalid response format";

/// Per-request options for [`SessionStore::authorized_request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<Value>,
    /// Overrides the store's default timeout
    pub timeout: Option<Duration>,
    /// Cancelling this token aborts the request without reporting an error
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            body: None,
            timeout: None,
            cancel: None,
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post(body: Value) -> Self {
        Self::new(HttpMethod::Post).with_body(body)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    /// Last user-visible error; never set by intentional cancellation
    error: Option<String>,
}

type Registry = Mutex<HashMap<u64, CancellationToken>>;

/// Removes a request from the in-flight registry when it completes or is dropped.
struct InFlight<'a> {
    id: u64,
    registry: &'a Registry,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Holds the current session and performs authenticated requests.
///
/// The session is persisted under [`AUTH_KEY`] and restored on construction.
/// Any request answered with 401 invalidates the local session before the
/// error is returned.
pub struct SessionStore {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    requests: Registry,
    next_request_id: AtomicU64,
    request_timeout: Duration,
    logout_timeout: Duration,
}

impl SessionStore {
    /// Creates the store and restores any persisted session.
    ///
    /// A persisted session that cannot be decoded is removed and the store
    /// starts signed out.
    pub async fn new(transport: Arc<dyn HttpTransport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_timeouts(transport, store, DEFAULT_REQUEST_TIMEOUT, DEFAULT_LOGOUT_TIMEOUT).await
    }

    pub async fn with_timeouts(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn KeyValueStore>,
        request_timeout: Duration,
        logout_timeout: Duration,
    ) -> Self {
        let session = Self {
            transport,
            store,
            state: RwLock::new(SessionState::default()),
            requests: Mutex::new(HashMap::new()),
            next_request_id: AtomicU64::new(0),
            request_timeout,
            logout_timeout,
        };
        session.restore().await;
        session
    }

    async fn restore(&self) {
        let stored = match self.store.get(AUTH_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Failed to read stored session: {}", e);
                return;
            }
        };
        let Some(raw) = stored else {
            return;
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                tracing::debug!("Restored session for {}", user.email);
                self.state.write().await.user = Some(user);
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable stored session: {}", e);
                if let Err(e) = self.store.remove(AUTH_KEY).await {
                    tracing::warn!("Failed to remove stored session: {}", e);
                }
            }
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub async fn session(&self) -> Session {
        Session {
            user: self.state.read().await.user.clone(),
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// True while at least one request is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight_requests() > 0
    }

    pub fn in_flight_requests(&self) -> usize {
        self.lock_requests().len()
    }

    // ============================================================================
    // Authentication
    // ============================================================================

    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let body = serde_json::to_value(credentials)?;
        self.authenticate(LOGIN_PATH, body).await
    }

    pub async fn signup(&self, profile: &SignupProfile) -> Result<User> {
        let body = serde_json::to_value(profile)?;
        self.authenticate(SIGNUP_PATH, body).await
    }

    async fn authenticate(&self, path: &str, body: Value) -> Result<User> {
        let response = self
            .authorized_request(path, RequestOptions::post(body))
            .await?;

        let user = serde_json::from_str::<AuthResponse>(&response.body)
            .ok()
            .and_then(|parsed| parsed.user);

        let Some(user) = user else {
            let err = IdeError::auth(INVALID_AUTH_RESPONSE);
            self.state.write().await.error = Some(err.to_string());
            return Err(err);
        };

        self.persist_user(&user).await?;
        tracing::info!("Signed in as {}", user.email);
        Ok(user)
    }

    async fn persist_user(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(AUTH_KEY, raw).await?;

        let mut state = self.state.write().await;
        state.user = Some(user.clone());
        state.error = None;
        Ok(())
    }

    /// Signs out.
    ///
    /// The remote call is best-effort and bounded by the logout timeout; the
    /// local session is cleared whatever its outcome.
    pub async fn logout(&self) {
        let options = RequestOptions::new(HttpMethod::Post).with_timeout(self.logout_timeout);
        match self.authorized_request(LOGOUT_PATH, options).await {
            Ok(_) => tracing::debug!("Remote logout succeeded"),
            Err(IdeError::Cancelled) => tracing::debug!("Remote logout cancelled"),
            Err(e) => tracing::warn!("Logout API call failed, clearing locally anyway: {}", e),
        }
        self.clear_auth().await;
    }

    /// Drops the local session and its persisted copy.
    pub async fn clear_auth(&self) {
        {
            let mut state = self.state.write().await;
            state.user = None;
            state.error = None;
        }
        if let Err(e) = self.store.remove(AUTH_KEY).await {
            tracing::warn!("Failed to remove stored session: {}", e);
        }
    }

    // ============================================================================
    // Requests
    // ============================================================================

    /// Sends a request to the backend, attaching the bearer token when signed in.
    ///
    /// Each call registers its own cancellation token and is bounded by its own
    /// timeout. Non-2xx responses become errors; a 401 also signs the user out.
    pub async fn authorized_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let mut request = HttpRequest::new(options.method, path);
        request.body = options.body;
        request.bearer_token = self
            .state
            .read()
            .await
            .user
            .as_ref()
            .map(|user| user.token.clone());

        let timeout = options.timeout.unwrap_or(self.request_timeout);
        let cancel = options
            .cancel
            .map(|parent| parent.child_token())
            .unwrap_or_default();

        self.state.write().await.error = None;
        let outcome = {
            let _in_flight = self.register(cancel.clone());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(IdeError::Cancelled),
                sent = tokio::time::timeout(timeout, self.transport.send(request)) => {
                    sent.unwrap_or(Err(IdeError::Timeout))
                }
            }
        };

        let outcome = match outcome {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(self.reject(response).await),
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            if e.is_cancelled() {
                tracing::debug!("Request to {} cancelled", path);
            } else {
                tracing::warn!("API error ({}): {}", path, e);
                self.state.write().await.error = Some(e.to_string());
            }
        }

        outcome
    }

    async fn reject(&self, response: HttpResponse) -> IdeError {
        if response.status == 401 {
            tracing::info!("Authorization rejected, clearing local session");
            self.clear_auth().await;
            let message = response
                .body_message()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string());
            return IdeError::auth(message);
        }
        IdeError::http(response.status, response.error_message())
    }

    /// Cancels every in-flight request.
    pub fn cancel_all(&self) {
        let requests = self.lock_requests();
        for token in requests.values() {
            token.cancel();
        }
        if !requests.is_empty() {
            tracing::debug!("Cancelled {} in-flight request(s)", requests.len());
        }
    }

    fn register(&self, token: CancellationToken) -> InFlight<'_> {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        self.lock_requests().insert(id, token);
        InFlight {
            id,
            registry: &self.requests,
        }
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, HashMap<u64, CancellationToken>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
