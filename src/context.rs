//! Per-run wiring shared by every command.

use std::sync::Arc;

use tracing::debug;

use salonhub_auth::{FileTokenStorage, SessionManager, SessionService};
use salonhub_client::{ApiClient, LoginRedirect};
use salonhub_core::config::AppConfig;
use salonhub_core::error::AppError;

use crate::output;

/// Configuration, restored session and API client for one invocation.
pub struct Context {
    pub config: AppConfig,
    pub session: Arc<SessionManager>,
    pub client: Arc<ApiClient>,
}

impl Context {
    /// Opens the token file, restores any persisted session and builds the client.
    pub async fn connect(config: AppConfig) -> Result<Self, AppError> {
        let storage = Arc::new(FileTokenStorage::new(config.session.storage_path.clone()));
        debug!(path = %storage.path().display(), "Using token storage");
        let session = Arc::new(SessionManager::new(&config.session, storage)?);

        match session.restore_on_startup().await? {
            Some(identity) => debug!(user_id = %identity.id, "Restored persisted session"),
            None => debug!("Starting without a session"),
        }

        let client = ApiClient::new(&config.api, session.clone())?
            .with_redirect(Arc::new(TerminalRedirect));

        Ok(Self {
            config,
            session,
            client: Arc::new(client),
        })
    }
}

/// Tells the user to sign in again when the API rejects the session.
#[derive(Debug)]
struct TerminalRedirect;

impl LoginRedirect for TerminalRedirect {
    fn redirect(&self, _location: &str) {
        output::print_warning("Session is no longer valid. Run `salonhub login` to sign in again.");
    }
}
