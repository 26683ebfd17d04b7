// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use password::{hash_password, verify_password, HashingError};
pub use service::{AuthError, AuthService};
pub use service_impl::DefaultAuth;
pub use token::{Claims, Clock, SystemClock, TokenError, TokenIssuer, TOKEN_TTL};
