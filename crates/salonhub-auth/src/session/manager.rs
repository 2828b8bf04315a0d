//! Session lifecycle: login, logout, restore and expiry detection.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use salonhub_core::config::{MalformedTokenPolicy, SessionConfig};
use salonhub_core::result::AppResult;

use super::{Identity, SessionService};
use crate::error::AuthError;
use crate::storage::TokenStorage;
use crate::token::TokenDecoder;
use crate::token::claims::expired;

/// Current authentication state.
#[derive(Debug, Clone)]
enum SessionState {
    /// No user is signed in.
    Anonymous,
    /// A user is signed in with a valid token.
    Authenticated(ActiveSession),
}

#[derive(Debug, Clone)]
struct ActiveSession {
    token: String,
    identity: Identity,
    /// `None` only for identities accepted under [`MalformedTokenPolicy::EmptyIdentity`].
    expires_at: Option<DateTime<Utc>>,
}

/// The process-wide session store.
///
/// Constructed once at startup and shared by `Arc` with the HTTP client and
/// anything else that needs to know who is signed in. Mutations hold the
/// state lock across storage I/O so the persisted token always matches the
/// in-memory state.
#[derive(Debug)]
pub struct SessionManager {
    /// Token decoder.
    decoder: TokenDecoder,
    /// Durable storage for the bearer token.
    storage: Arc<dyn TokenStorage>,
    /// Key the token is persisted under.
    storage_key: String,
    /// Handling of undecodable tokens at login.
    malformed_policy: MalformedTokenPolicy,
    /// Anonymous / authenticated state.
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Creates an anonymous session manager from configuration.
    pub fn new(config: &SessionConfig, storage: Arc<dyn TokenStorage>) -> AppResult<Self> {
        Ok(Self {
            decoder: TokenDecoder::new(config)?,
            storage,
            storage_key: config.storage_key.clone(),
            malformed_policy: config.malformed_token_policy,
            state: RwLock::new(SessionState::Anonymous),
        })
    }

    /// Expiry instant of the active session, if any.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.active().await.and_then(|session| session.expires_at)
    }

    /// Returns the active session, tearing it down if it has expired.
    async fn active(&self) -> Option<ActiveSession> {
        let now = Utc::now();
        {
            let state = self.state.read().await;
            match &*state {
                SessionState::Anonymous => return None,
                SessionState::Authenticated(session) if !self.is_expired(session, now) => {
                    return Some(session.clone());
                }
                SessionState::Authenticated(_) => {}
            }
        }

        let mut state = self.state.write().await;
        // Another task may have replaced the session while we waited.
        if let SessionState::Authenticated(session) = &*state {
            if !self.is_expired(session, now) {
                return Some(session.clone());
            }
            info!(user_id = %session.identity.id, "Session token expired, signing out");
            if let Err(e) = self.clear(&mut state).await {
                warn!(error = %e, "Failed to remove expired token from storage");
            }
        }
        None
    }

    fn is_expired(&self, session: &ActiveSession, now: DateTime<Utc>) -> bool {
        session
            .expires_at
            .is_some_and(|exp| expired(exp, now, self.decoder.leeway()))
    }

    /// Moves to the anonymous state and removes the persisted token.
    async fn clear(&self, state: &mut SessionState) -> Result<(), AuthError> {
        if let SessionState::Authenticated(session) = &*state {
            info!(user_id = %session.identity.id, "Session cleared");
        }
        *state = SessionState::Anonymous;
        self.storage
            .remove(&self.storage_key)
            .await
            .map_err(AuthError::Storage)
    }

    async fn establish(
        &self,
        state: &mut SessionState,
        token: &str,
        identity: Identity,
        expires_at: Option<DateTime<Utc>>,
        persist: bool,
    ) -> Result<Identity, AuthError> {
        if persist {
            self.storage
                .store(&self.storage_key, token)
                .await
                .map_err(AuthError::Storage)?;
        }
        *state = SessionState::Authenticated(ActiveSession {
            token: token.to_string(),
            identity: identity.clone(),
            expires_at,
        });
        Ok(identity)
    }
}

#[async_trait]
impl SessionService for SessionManager {
    async fn login(&self, token: &str) -> Result<Identity, AuthError> {
        let mut state = self.state.write().await;

        let decoded = match self.decoder.decode(token) {
            Ok(decoded) => decoded,
            Err(AuthError::Malformed(reason))
                if self.malformed_policy == MalformedTokenPolicy::EmptyIdentity =>
            {
                warn!(%reason, "Accepting undecodable token with an empty identity");
                return self
                    .establish(&mut state, token, Identity::default(), None, true)
                    .await;
            }
            Err(e) => {
                warn!(error = %e, "Rejecting login token");
                self.clear(&mut state).await?;
                return Err(e);
            }
        };

        if self.decoder.is_expired(&decoded, Utc::now()) {
            warn!(expires_at = %decoded.expires_at, "Rejecting expired login token");
            self.clear(&mut state).await?;
            return Err(AuthError::Expired(decoded.expires_at));
        }

        let identity = self
            .establish(
                &mut state,
                token,
                decoded.identity,
                Some(decoded.expires_at),
                true,
            )
            .await?;

        info!(
            user_id = %identity.id,
            roles = ?identity.roles,
            expires_at = %decoded.expires_at,
            "Session established"
        );
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let mut state = self.state.write().await;
        self.clear(&mut state).await
    }

    async fn restore_on_startup(&self) -> Result<Option<Identity>, AuthError> {
        let mut state = self.state.write().await;

        let stored = self
            .storage
            .load(&self.storage_key)
            .await
            .map_err(AuthError::Storage)?;

        let Some(token) = stored else {
            debug!("No persisted session found");
            *state = SessionState::Anonymous;
            return Ok(None);
        };

        match self.decoder.decode(&token) {
            Ok(decoded) if !self.decoder.is_expired(&decoded, Utc::now()) => {
                let identity = self
                    .establish(
                        &mut state,
                        &token,
                        decoded.identity,
                        Some(decoded.expires_at),
                        false,
                    )
                    .await?;
                info!(user_id = %identity.id, expires_at = %decoded.expires_at, "Session restored");
                Ok(Some(identity))
            }
            Ok(decoded) => {
                info!(expires_at = %decoded.expires_at, "Persisted session has expired");
                self.clear(&mut state).await?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted session");
                self.clear(&mut state).await?;
                Ok(None)
            }
        }
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.active().await.map(|session| session.identity)
    }

    async fn bearer_token(&self) -> Option<String> {
        self.active().await.map(|session| session.token)
    }
}
