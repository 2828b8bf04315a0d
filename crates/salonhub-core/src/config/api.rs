//! Remote API configuration.

use serde::{Deserialize, Serialize};

/// Settings for the REST API the client talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Tenant identifier sent as `X-Tenant-ID` on every request, if set.
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Path of the credential login endpoint.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Location users are sent to when their session cannot be recovered.
    #[serde(default = "default_login_redirect")]
    pub login_redirect: String,
    /// Maximum number of requests parked while a token refresh is in flight.
    #[serde(default = "default_max_pending")]
    pub max_pending_refresh: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            tenant_id: None,
            login_path: default_login_path(),
            login_redirect: default_login_redirect(),
            max_pending_refresh: default_max_pending(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_login_redirect() -> String {
    "/login".to_string()
}

fn default_max_pending() -> usize {
    256
}
