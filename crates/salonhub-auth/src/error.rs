//! Authentication error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use salonhub_core::error::{AppError, ErrorKind};

/// Reasons a token or session operation can fail.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is not a decodable JWT.
    #[error("Invalid token format: {0}")]
    Malformed(String),
    /// The token signature does not match the configured secret.
    #[error("Invalid token signature")]
    InvalidSignature,
    /// The token's expiry instant has passed.
    #[error("Token has expired (exp: {0})")]
    Expired(DateTime<Utc>),
    /// The token carries a role outside the known set.
    #[error("Unknown role '{0}' in token")]
    UnknownRole(String),
    /// The operation needs an authenticated session.
    #[error("No active session")]
    NotAuthenticated,
    /// Reading or writing the persisted token failed.
    #[error("Token storage failure: {0}")]
    Storage(#[source] AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let kind = match &err {
            AuthError::Storage(inner) => inner.kind,
            _ => ErrorKind::Authentication,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
