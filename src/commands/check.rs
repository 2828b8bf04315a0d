//! `salonhub check <ROLE>...`

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use salonhub_auth::{AccessDecision, AuthError, Role, RoleGuard, SessionService};
use salonhub_core::error::AppError;

use crate::context::Context;
use crate::output::{self, OutputFormat};

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Roles to test, e.g. ADMIN or ROLE_MANAGER
    #[arg(required = true)]
    pub roles: Vec<String>,
}

/// Per-role result row
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role as given
    role: String,
    /// Whether the name is a known role
    known: String,
    /// Whether the session holds it
    granted: String,
}

/// Evaluate the role guard for the given roles.
///
/// Fails with an authentication error when nobody is signed in and an
/// authorization error when none of the roles is held.
pub async fn execute(args: &CheckArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let (known, unknown) = partition_roles(&args.roles);
    if known.is_empty() {
        return Err(AppError::validation(format!(
            "No known roles given (unknown: {}); expected one of {}",
            unknown.join(", "),
            Role::ALL.map(|r| r.as_str()).join(", ")
        )));
    }

    let mut rows = Vec::with_capacity(args.roles.len());
    for role in &args.roles {
        rows.push(RoleRow {
            role: role.clone(),
            known: output::yes_no(!unknown.contains(&role.as_str())),
            granted: output::yes_no(ctx.session.has_role(role).await),
        });
    }

    let guard = RoleGuard::any_of(known);
    match guard.check(ctx.session.as_ref()).await {
        AccessDecision::Allow => {
            output::print_list(&rows, format);
            output::print_success("Access granted");
            Ok(())
        }
        AccessDecision::RedirectToLogin => {
            output::print_warning("Run `salonhub login` first");
            Err(AuthError::NotAuthenticated.into())
        }
        AccessDecision::Unauthorized => {
            output::print_list(&rows, format);
            Err(AppError::authorization(format!(
                "Access denied: requires one of {}",
                guard.required().join(", ")
            )))
        }
    }
}

/// Split role names into recognised names and names that are not roles.
///
/// Recognised names keep their spelling; the guard matches them exactly.
fn partition_roles(names: &[String]) -> (Vec<&str>, Vec<&str>) {
    names
        .iter()
        .map(String::as_str)
        .partition(|name| name.parse::<Role>().is_ok())
}
