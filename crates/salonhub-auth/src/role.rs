//! Role enumeration carried in session tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Roles the backend may grant a user.
///
/// Tokens are validated against this set. Role checks compare the names
/// exactly as issued, so `ADMIN` and `ROLE_ADMIN` are different grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full system administrator.
    #[serde(alias = "ROLE_ADMIN")]
    Admin,
    /// Runs a salon or clinic unit: staff, finance and reports.
    #[serde(alias = "ROLE_MANAGER")]
    Manager,
    /// Staff member who performs services for clients.
    #[serde(alias = "ROLE_PROFESSIONAL")]
    Professional,
    /// Front-desk staff handling scheduling and check-in.
    #[serde(alias = "ROLE_ATTENDANT")]
    Attendant,
    /// Baseline authenticated user.
    #[serde(alias = "ROLE_USER")]
    User,
}

/// Prefix the backend puts in front of role names.
const BACKEND_PREFIX: &str = "ROLE_";

/// Role name the backend issues to administrators.
pub const ADMIN_AUTHORITY: &str = "ROLE_ADMIN";

impl Role {
    /// All known roles.
    pub const ALL: [Role; 5] = [
        Self::Admin,
        Self::Manager,
        Self::Professional,
        Self::Attendant,
        Self::User,
    ];

    /// Return the canonical upper-case role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Professional => "PROFESSIONAL",
            Self::Attendant => "ATTENDANT",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    /// Case-sensitive; recognises `ADMIN` as well as the backend's `ROLE_ADMIN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(BACKEND_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == name)
            .ok_or_else(|| AuthError::UnknownRole(s.to_string()))
    }
}
