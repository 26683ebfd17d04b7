// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Signup and signin endpoints.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use credential_common::{AccessToken, AuthRequest};

use crate::{error::AppError, AppState};

/// `POST /auth/signup`
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> Result<(StatusCode, Json<AccessToken>), AppError> {
    let token = state.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// `POST /auth/signin`
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<AccessToken>, AppError> {
    let token = state.auth.signin(request).await?;
    Ok(Json(token))
}
