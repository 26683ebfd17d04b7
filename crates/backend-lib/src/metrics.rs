// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP_SUCCEEDED: &str = "auth.signup.succeeded";
pub const SIGNUP_CONFLICT: &str = "auth.signup.conflict";
pub const SIGNIN_SUCCEEDED: &str = "auth.signin.succeeded";
pub const SIGNIN_REJECTED: &str = "auth.signin.rejected";
pub const TOKEN_ISSUED: &str = "auth.token.issued";
pub const GUARD_REJECTED: &str = "auth.guard.rejected";
