// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the credential server.

pub mod identity;

pub use identity::{require_principal, CurrentUser};
