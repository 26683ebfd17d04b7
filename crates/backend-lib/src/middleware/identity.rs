//! Bearer-token identity guard.
//!
//! `require_principal` verifies the presented token and stores the resolved
//! `Principal` in the request extensions; `CurrentUser` reads it back out in
//! handlers. A request that fails verification never reaches the handler.
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use credential_common::Principal;
use metrics::counter;

use crate::error::AppError;
use crate::metrics as keys;
use crate::AppState;

/// Reject the request unless it carries a valid bearer token
pub async fn require_principal(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match authenticate(&state, request.headers()) {
        Ok(principal) => principal,
        Err(e) => {
            counter!(keys::GUARD_REJECTED).increment(1);
            tracing::debug!(error = %e, "request rejected by identity guard");
            return Err(e);
        },
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthenticated("missing bearer token".to_string()))?;
    let claims = state.tokens.verify(token)?;
    Ok(claims.principal()?)
}

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Principal attached by `require_principal`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthenticated("no authenticated principal".to_string()))
    }
}
