//! # salonhub-auth
//!
//! Client-side authentication state for SalonHub.
//!
//! ## Modules
//!
//! - `role`: closed set of roles a token may carry
//! - `token`: claims decoding and expiry checks
//! - `storage`: durable persistence of the bearer token
//! - `session`: the session store (anonymous / authenticated state machine)
//! - `guard`: role-based access decisions

pub mod error;
pub mod guard;
pub mod role;
pub mod session;
pub mod storage;
pub mod token;

pub use error::AuthError;
pub use guard::{AccessDecision, RoleGuard};
pub use role::{ADMIN_AUTHORITY, Role};
pub use session::{Identity, SessionManager, SessionService};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use token::{Claims, DecodedToken, TokenDecoder};
