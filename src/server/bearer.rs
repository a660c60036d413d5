//! `Authorization: Bearer <token>` extraction for protected routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::AppState;
use crate::error::{AppError, AuthError};
use crate::identity::{AuthProvider, Credential};

/// An enabled account resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Credential);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(AppError::auth("not_authenticated", "Not authenticated"));
        };
        match state.auth.resolve_active_user(token) {
            Ok(cred) => Ok(CurrentUser(cred)),
            Err(e @ AuthError::InactiveAccount) => {
                tracing::info!(target: "healthqai::auth", "inactive account presented a valid token");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
