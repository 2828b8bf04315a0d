//! `salonhub whoami`

use serde::Serialize;
use tabled::Tabled;

use salonhub_auth::{Identity, SessionManager, SessionService};
use salonhub_core::error::AppError;

use crate::context::Context;
use crate::output::{self, OutputFormat};

/// Signed-in user display row
#[derive(Debug, Serialize, Tabled)]
pub struct IdentityRow {
    /// Subject id
    id: String,
    /// Login name
    username: String,
    /// Display name
    name: String,
    /// Email
    email: String,
    /// Roles
    roles: String,
    /// Administrator
    admin: String,
    /// Token expiry
    expires_at: String,
}

impl IdentityRow {
    pub async fn new(identity: &Identity, session: &SessionManager) -> Self {
        let expires_at = session
            .expires_at()
            .await
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());

        Self {
            id: identity.id.clone(),
            username: identity.username.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            roles: join_roles(identity),
            admin: output::yes_no(session.is_admin().await),
            expires_at,
        }
    }
}

fn join_roles(identity: &Identity) -> String {
    identity.roles.join(", ")
}

/// Show who is signed in
pub async fn execute(ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    match ctx.session.current_identity().await {
        Some(identity) => {
            let row = IdentityRow::new(&identity, ctx.session.as_ref()).await;
            output::print_item(&row, format);
        }
        None => output::print_warning("Not signed in"),
    }
    Ok(())
}
