//! `salonhub login`

use clap::Args;

use salonhub_client::AuthApi;
use salonhub_core::error::AppError;

use super::whoami::IdentityRow;
use crate::context::Context;
use crate::output::{self, OutputFormat};

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (will prompt if not provided)
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Exchange credentials for a token and persist the session
pub async fn execute(args: &LoginArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let username = match &args.username {
        Some(u) => u.clone(),
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    let auth = AuthApi::new(ctx.client.clone(), &ctx.config.api);
    let identity = auth.login(&username, &password).await?;

    output::print_success(&format!("Signed in as {}", identity.username));
    let row = IdentityRow::new(&identity, ctx.session.as_ref()).await;
    output::print_item(&row, format);
    Ok(())
}
