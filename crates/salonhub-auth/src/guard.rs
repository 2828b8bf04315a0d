//! Role-based access decisions for protected areas.

use crate::session::SessionService;

/// Outcome of checking a session against a role requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The session satisfies the requirement.
    Allow,
    /// Nobody is signed in; send the user to the login entry point.
    RedirectToLogin,
    /// Signed in, but without any of the required roles.
    Unauthorized,
}

/// Requires an authenticated session holding at least one of a set of roles.
///
/// Role names are matched exactly as the token spells them. An empty role
/// set only requires authentication.
#[derive(Debug, Clone, Default)]
pub struct RoleGuard {
    /// Accepted role names.
    required: Vec<String>,
}

impl RoleGuard {
    /// A guard that only requires authentication.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// A guard satisfied by any of `roles`.
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// The accepted role names.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Evaluates the guard against the current session.
    pub async fn check(&self, session: &dyn SessionService) -> AccessDecision {
        let Some(identity) = session.current_identity().await else {
            return AccessDecision::RedirectToLogin;
        };

        if self.required.is_empty() || identity.has_any_role(self.required.as_slice()) {
            AccessDecision::Allow
        } else {
            tracing::debug!(
                user_id = %identity.id,
                required = ?self.required,
                "Access denied: missing required role"
            );
            AccessDecision::Unauthorized
        }
    }
}
