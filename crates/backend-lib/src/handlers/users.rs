//! Endpoints for the authenticated user.
use axum::Json;
use credential_common::Principal;

use crate::middleware::CurrentUser;

/// `GET /users/me`
pub async fn me(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}
