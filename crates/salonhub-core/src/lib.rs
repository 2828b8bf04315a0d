//! # salonhub-core
//!
//! Core crate for SalonHub clients. Contains the configuration schemas
//! and the unified error system shared by the auth and HTTP client crates.
//!
//! This crate has **no** internal dependencies on other SalonHub crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
