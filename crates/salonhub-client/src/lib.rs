//! # salonhub-client
//!
//! Authenticated HTTP access to the SalonHub REST API.
//!
//! Every call goes through [`ApiClient`], which attaches the session's bearer
//! token, classifies failures, and recovers from a 401 with a single-flight
//! token refresh. Requests that hit a 401 while a refresh is already running
//! are parked and settled together when it finishes.

pub mod auth_api;
pub mod client;
pub mod error;
pub mod redirect;
pub mod refresh;
pub mod request;

pub use auth_api::{AuthApi, AuthResponse};
pub use client::{ApiClient, TENANT_HEADER};
pub use error::ApiError;
pub use redirect::{LoggingRedirect, LoginRedirect};
pub use refresh::{FailClosedRefresher, RefreshCoordinator, TokenRefresher};
pub use request::ApiRequest;
