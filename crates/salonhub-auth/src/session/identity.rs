//! Identity derived from token claims.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::role::Role;
use crate::token::Claims;

/// Who the session belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject id.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Granted roles, spelled exactly as the token carries them.
    pub roles: Vec<String>,
}

impl Identity {
    /// Build an identity from claims, rejecting unknown role names.
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let roles = claims.roles.clone().unwrap_or_default();
        for role in &roles {
            role.parse::<Role>()?;
        }

        Ok(Self {
            id: claims.sub.clone(),
            username: claims.username.clone().unwrap_or_default(),
            name: claims.name.clone().unwrap_or_default(),
            email: claims.email.clone().unwrap_or_default(),
            roles,
        })
    }

    /// Exact, case-sensitive membership test.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held == role)
    }

    /// Whether the identity holds at least one of `roles`.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }
}
