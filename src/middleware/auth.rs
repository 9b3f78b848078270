//! Bearer-token extractor for protected routes.
//!
//! Handlers opt in by taking an [`AuthUser`] parameter; the extractor runs
//! before the handler body and rejects the request if the `Authorization`
//! header is missing, malformed, or carries a bad token. Verification is
//! purely in-memory signature checking, so any service holding the shared
//! signing secret can reuse this extractor without calling the auth service.
//!
//! Failure modes:
//!
//! - no header, or not `Bearer <token>` with exactly one space → 401 generic
//! - valid signature but past expiry → 401 with code `TOKEN_EXPIRED`, a hint
//!   to the client to refresh instead of re-login
//! - any other verification failure → 401 generic

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::users::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_access_token;

/// Verified identity of the caller, carried from the middleware into the
/// handler as an explicit typed value rather than ambient request state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;

        let token = parse_bearer(auth_header).ok_or_else(|| {
            AppError::Unauthorized("invalid authorization header format".to_string())
        })?;

        let claims = verify_access_token(token, &state.jwt_config)?;

        Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Accepts `Bearer <token>` with a case-insensitive scheme and exactly one
/// separating space.
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return None;
    }
    Some(token)
}
