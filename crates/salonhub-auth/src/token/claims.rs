//! JWT claims structure issued by the SalonHub auth service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Identity;

/// JWT claims payload embedded in every session token.
///
/// Only `sub` and `exp` are required; profile fields and roles may be
/// absent or `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Granted roles, as issued by the backend (`ROLE_ADMIN`, `ATTENDANT`, ...).
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: Option<i64>,
}

/// A structurally valid token together with the identity it carries.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    /// Raw claims.
    pub claims: Claims,
    /// Identity derived from the claims.
    pub identity: Identity,
    /// Instant after which the token is no longer accepted.
    pub expires_at: DateTime<Utc>,
}

impl DecodedToken {
    /// Whether the token is expired at `now`, allowing `leeway` of clock skew.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        expired(self.expires_at, now, leeway)
    }
}

/// `now >= expires_at + leeway`. A deadline past the end of the calendar
/// never arrives.
pub(crate) fn expired(expires_at: DateTime<Utc>, now: DateTime<Utc>, leeway: Duration) -> bool {
    expires_at
        .checked_add_signed(leeway)
        .is_some_and(|deadline| now >= deadline)
}
