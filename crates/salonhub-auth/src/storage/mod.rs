//! Durable client-side storage for the bearer token.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use salonhub_core::result::AppResult;

pub use file::FileTokenStorage;
pub use memory::MemoryTokenStorage;

/// Key/value string storage that survives process restarts.
///
/// Absent keys read as `None`; removing an absent key is not an error.
#[async_trait]
pub trait TokenStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Read the value stored under `key`.
    async fn load(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn store(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove `key`.
    async fn remove(&self, key: &str) -> AppResult<()>;
}
