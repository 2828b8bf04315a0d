//! Convenience result type alias for SalonHub.

use crate::error::AppError;

/// A specialized `Result` type for SalonHub operations.
pub type AppResult<T> = Result<T, AppError>;
