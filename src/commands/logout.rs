//! `salonhub logout`

use salonhub_auth::SessionService;
use salonhub_core::error::AppError;

use crate::context::Context;
use crate::output;

/// Clear the session. Succeeds when nobody is signed in.
pub async fn execute(ctx: &Context) -> Result<(), AppError> {
    let was_signed_in = ctx.session.is_authenticated().await;
    ctx.session.logout().await?;

    if was_signed_in {
        output::print_success("Signed out");
    } else {
        output::print_warning("Not signed in");
    }
    Ok(())
}
