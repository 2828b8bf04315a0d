//! Hook fired when the session cannot be recovered.

use tracing::warn;

/// Sends the user back to the login entry point.
///
/// Called once per failed refresh, however many requests were waiting on it.
pub trait LoginRedirect: Send + Sync + std::fmt::Debug + 'static {
    /// Navigate to `location`.
    fn redirect(&self, location: &str);
}

/// Redirect hook for headless use: records the event in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRedirect;

impl LoginRedirect for LoggingRedirect {
    fn redirect(&self, location: &str) {
        warn!(%location, "Session could not be recovered, login required");
    }
}
