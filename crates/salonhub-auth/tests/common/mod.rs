//! Shared helpers for session integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use salonhub_auth::{MemoryTokenStorage, SessionManager, TokenStorage};
use salonhub_core::config::SessionConfig;

/// Secret the test tokens are signed with.
pub const SECRET: &str = "session-test-secret";

/// Storage key used by the default session configuration.
pub const TOKEN_KEY: &str = "token";

/// Mint a token for `sub` with the given roles, expiring `ttl` from now.
pub fn token(sub: &str, roles: &[&str], ttl: Duration) -> String {
    token_expiring_at(sub, roles, (Utc::now() + ttl).timestamp())
}

/// Mint a token for `sub` with an explicit `exp` claim.
pub fn token_expiring_at(sub: &str, roles: &[&str], exp: i64) -> String {
    let claims = json!({
        "sub": sub,
        "username": format!("{sub}-login"),
        "name": format!("User {sub}"),
        "email": format!("{sub}@salon.test"),
        "roles": roles,
        "iat": Utc::now().timestamp(),
        "exp": exp,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// A session manager over fresh in-memory storage.
pub fn session() -> (Arc<SessionManager>, Arc<MemoryTokenStorage>) {
    session_with(SessionConfig::default())
}

/// A session manager with custom configuration over fresh in-memory storage.
pub fn session_with(config: SessionConfig) -> (Arc<SessionManager>, Arc<MemoryTokenStorage>) {
    let storage = Arc::new(MemoryTokenStorage::new());
    let manager = SessionManager::new(&config, storage.clone() as Arc<dyn TokenStorage>).unwrap();
    (Arc::new(manager), storage)
}
