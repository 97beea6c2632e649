//! HTTP middleware for TMS Core
//!
//! - `AuthUser` extractor for handlers that need the caller's identity
//! - `require_auth` gate protecting every `/api` resource route

pub mod auth;
pub mod require_auth;

pub use auth::{AuthError, AuthUser};
pub use require_auth::require_auth;
