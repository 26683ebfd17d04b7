//! HTTP handlers.

pub mod auth;
pub mod users;

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}
