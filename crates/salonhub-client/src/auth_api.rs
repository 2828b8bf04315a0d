//! Credential login against the auth service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use salonhub_auth::Identity;
use salonhub_core::config::ApiConfig;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;

/// Credentials posted to the login endpoint.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Login and logout on top of an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
    login_path: String,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>, config: &ApiConfig) -> Self {
        Self {
            client,
            login_path: config.login_path.clone(),
        }
    }

    /// Exchanges credentials for a token and signs the session in with it.
    ///
    /// Bad credentials come back as a plain 401 error; the client's refresh
    /// path is not involved.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let request = ApiRequest::post(self.login_path.as_str())
            .anonymous()
            .json(&LoginRequest { username, password })?;

        let response: AuthResponse = self.client.send_json(request).await?;
        let identity = self.client.session().login(&response.token).await?;

        info!(user_id = %identity.id, username, "Logged in");
        Ok(identity)
    }

    /// Signs the session out.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.session().logout().await?;
        Ok(())
    }
}
