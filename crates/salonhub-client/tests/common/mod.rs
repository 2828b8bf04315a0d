//! Shared helpers: an in-process backend, token minting and test hooks.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tokio::sync::{Notify, RwLock};

use salonhub_auth::{MemoryTokenStorage, SessionManager, TokenStorage};
use salonhub_client::{ApiClient, ApiError, LoginRedirect, TokenRefresher};
use salonhub_core::config::{ApiConfig, SessionConfig};
use salonhub_core::error::{AppError, ErrorKind};
use salonhub_core::result::AppResult;

/// Storage key used by the default session configuration.
pub const TOKEN_KEY: &str = "token";

/// Password the fake auth endpoint accepts.
pub const PASSWORD: &str = "s3cret";

/// Mint a backend-issued token for `sub`, expiring `ttl` from now.
pub fn token(sub: &str, roles: &[&str], ttl: chrono::Duration) -> String {
    let now = chrono::Utc::now();
    let claims = json!({
        "sub": sub,
        "username": sub,
        "name": format!("User {sub}"),
        "email": format!("{sub}@salon.test"),
        "roles": roles,
        "iat": now.timestamp(),
        "exp": (now + ttl).timestamp(),
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

/// A fresh session over in-memory storage.
pub fn session() -> (Arc<SessionManager>, Arc<MemoryTokenStorage>) {
    session_over(MemoryTokenStorage::new())
}

/// A fresh session over `storage`.
pub fn session_over<S: TokenStorage>(storage: S) -> (Arc<SessionManager>, Arc<S>) {
    let storage = Arc::new(storage);
    let manager = SessionManager::new(
        &SessionConfig::default(),
        storage.clone() as Arc<dyn TokenStorage>,
    )
    .unwrap();
    (Arc::new(manager), storage)
}

/// In-memory storage whose writes can be switched to fail.
#[derive(Debug, Default)]
pub struct ReadOnlyAfter {
    inner: MemoryTokenStorage,
    read_only: AtomicBool,
}

impl ReadOnlyAfter {
    /// Make every later `store` fail.
    pub fn lock_writes(&self) {
        self.read_only.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TokenStorage for ReadOnlyAfter {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.load(key).await
    }

    async fn store(&self, key: &str, value: &str) -> AppResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(AppError::new(
                ErrorKind::Storage,
                "storage is read-only",
            ));
        }
        self.inner.store(key, value).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key).await
    }
}

/// A client for `base_url` with default settings.
pub fn client(base_url: &str, session: Arc<SessionManager>) -> ApiClient {
    client_with(
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        },
        session,
    )
}

pub fn client_with(config: ApiConfig, session: Arc<SessionManager>) -> ApiClient {
    ApiClient::new(&config, session).unwrap()
}

/// Scripted backend state.
#[derive(Clone)]
pub struct BackendState {
    /// Token `/api/clients` accepts.
    accepted: Arc<RwLock<String>>,
    /// Token handed out by `/api/auth/login`.
    login_token: Arc<String>,
    /// Requests seen by `/api/clients`.
    hits: Arc<AtomicUsize>,
}

/// An axum server on an ephemeral local port.
pub struct Backend {
    pub base_url: String,
    pub state: BackendState,
}

impl Backend {
    /// Start a backend whose protected route accepts no token yet.
    pub async fn spawn() -> Self {
        Self::spawn_with_login_token(token("from-login", &["ROLE_USER"], chrono::Duration::hours(1)))
            .await
    }

    pub async fn spawn_with_login_token(login_token: String) -> Self {
        let state = BackendState {
            accepted: Arc::new(RwLock::new(String::new())),
            login_token: Arc::new(login_token),
            hits: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/api/clients", get(clients))
            .route("/api/echo", get(echo))
            .route("/api/boom", get(boom))
            .route("/api/forbidden", get(forbidden))
            .route("/api/missing", get(missing).delete(missing))
            .route("/api/slow", get(slow))
            .route("/api/auth/login", post(login))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Make `/api/clients` accept `token`.
    pub async fn accept(&self, token: &str) {
        *self.state.accepted.write().await = token.to_string();
    }

    /// Number of requests `/api/clients` has served.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn login_token(&self) -> &str {
        &self.state.login_token
    }
}

async fn clients(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let accepted = state.accepted.read().await.clone();
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if !accepted.is_empty() && token == accepted => {
            Json(json!([{ "id": 1, "name": "Maria Oliveira" }])).into_response()
        }
        _ => (StatusCode::UNAUTHORIZED, "token rejected").into_response(),
    }
}

async fn echo(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "authorization": header("authorization"),
        "tenant": header("x-tenant-id"),
        "source": header("x-request-source"),
        "query": query,
    }))
}

async fn boom() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "database down").into_response()
}

async fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "finance is admin only").into_response()
}

async fn missing() -> Response {
    (StatusCode::NOT_FOUND, "no such client").into_response()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "late"
}

async fn login(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({
            "token": state.login_token.as_str(),
            "refreshToken": null,
            "userId": "3f1c7a52-3a8e-4a55-9a47-0d5c0f9ab001",
            "username": body["username"],
            "email": "maria@salon.test",
            "firstName": "Maria",
            "lastName": "Oliveira",
            "roles": ["ROLE_USER"],
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
    }
}

/// Refresher that blocks until released, then returns a fixed outcome.
#[derive(Debug)]
pub struct GatedRefresher {
    gate: Arc<Notify>,
    token: Option<String>,
}

impl GatedRefresher {
    pub fn failing(gate: Arc<Notify>) -> Self {
        Self { gate, token: None }
    }

    pub fn succeeding(gate: Arc<Notify>, token: String) -> Self {
        Self {
            gate,
            token: Some(token),
        }
    }
}

#[async_trait]
impl TokenRefresher for GatedRefresher {
    async fn refresh(&self) -> Result<String, ApiError> {
        self.gate.notified().await;
        self.token
            .clone()
            .ok_or_else(|| ApiError::Refresh("refresh rejected by test".to_string()))
    }
}

/// Refresher that immediately returns a fixed token.
#[derive(Debug)]
pub struct StaticRefresher(pub String);

#[async_trait]
impl TokenRefresher for StaticRefresher {
    async fn refresh(&self) -> Result<String, ApiError> {
        Ok(self.0.clone())
    }
}

/// Redirect hook that records every invocation.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    calls: AtomicUsize,
    last: Mutex<Option<String>>,
}

impl RecordingRedirect {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<String> {
        self.last.lock().unwrap().clone()
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect(&self, location: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(location.to_string());
    }
}

/// Poll `condition` until it holds, failing after five seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
