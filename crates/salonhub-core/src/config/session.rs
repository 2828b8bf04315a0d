//! Session persistence and token handling configuration.

use serde::{Deserialize, Serialize};

/// What to do with a token whose claims cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedTokenPolicy {
    /// Refuse the login and stay anonymous.
    #[default]
    Reject,
    /// Accept the login with an identity whose fields are all empty.
    EmptyIdentity,
}

/// Client-side session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the persisted bearer token.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Key the bearer token is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// HMAC secret used to verify token signatures. Signatures are not
    /// checked when unset.
    #[serde(default)]
    pub verification_secret: Option<String>,
    /// Handling of tokens whose claims cannot be decoded.
    #[serde(default)]
    pub malformed_token_policy: MalformedTokenPolicy,
    /// Clock skew tolerated when checking token expiry, in seconds.
    #[serde(default)]
    pub clock_leeway_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            storage_key: default_storage_key(),
            verification_secret: None,
            malformed_token_policy: MalformedTokenPolicy::default(),
            clock_leeway_seconds: 0,
        }
    }
}

fn default_storage_path() -> String {
    "data/session.json".to_string()
}

fn default_storage_key() -> String {
    "token".to_string()
}
