//! Application configuration schemas.
//!
//! Configuration is merged from optional TOML files and environment
//! variables via the `config` crate. Every field carries a default so an
//! empty environment still yields a usable configuration.

pub mod api;
pub mod logging;
pub mod session;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::logging::LoggingConfig;
pub use self::session::{MalformedTokenPolicy, SessionConfig};

use crate::error::AppError;

/// Prefix for configuration environment variables (`SALONHUB__API__BASE_URL`).
const ENV_PREFIX: &str = "SALONHUB";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Local session persistence and token handling.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the `config/` directory of the working directory.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `SALONHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from(Path::new("config"), env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &Path, env: &str) -> Result<Self, AppError> {
        let default_file = dir.join("default");
        let env_file = dir.join(env);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&env_file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
