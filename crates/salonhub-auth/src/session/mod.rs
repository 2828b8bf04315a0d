//! Client session store.
//!
//! A session is either anonymous or authenticated with a decoded, unexpired
//! bearer token. [`SessionService`] is the capability set callers depend on;
//! [`SessionManager`] is the implementation constructed once per process.

pub mod identity;
pub mod manager;

use async_trait::async_trait;

pub use identity::Identity;
pub use manager::SessionManager;

use crate::error::AuthError;
use crate::role::ADMIN_AUTHORITY;

/// Operations exposed by the session store.
#[async_trait]
pub trait SessionService: Send + Sync + std::fmt::Debug + 'static {
    /// Authenticate with a bearer token, persisting it for later restores.
    async fn login(&self, token: &str) -> Result<Identity, AuthError>;

    /// Drop the session and its persisted token. Safe to call repeatedly.
    async fn logout(&self) -> Result<(), AuthError>;

    /// Re-establish a persisted session, if one exists and is still valid.
    async fn restore_on_startup(&self) -> Result<Option<Identity>, AuthError>;

    /// Identity of the authenticated user, or `None` when anonymous.
    async fn current_identity(&self) -> Option<Identity>;

    /// Bearer token to attach to outgoing requests, or `None` when anonymous.
    async fn bearer_token(&self) -> Option<String>;

    /// Whether a valid session is active.
    async fn is_authenticated(&self) -> bool {
        self.current_identity().await.is_some()
    }

    /// Exact, case-sensitive role membership against the names the token
    /// carries. Anonymous sessions yield `false`.
    async fn has_role(&self, role: &str) -> bool {
        self.current_identity()
            .await
            .is_some_and(|identity| identity.has_role(role))
    }

    /// Whether the current user holds [`ADMIN_AUTHORITY`].
    async fn is_admin(&self) -> bool {
        self.has_role(ADMIN_AUTHORITY).await
    }
}
