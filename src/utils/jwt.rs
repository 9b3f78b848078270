//! Access-token creation and verification.
//!
//! Access tokens are HS256-signed JWTs carrying the user's id, email, and
//! role, so every service holding the shared secret can authorize requests
//! without a store lookup. Verification pins the algorithm to HS256 (a token
//! declaring any other algorithm is rejected) and enforces expiry with zero
//! leeway, distinguishing `TokenExpired` from every other failure mode.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;
use crate::modules::users::model::User;
use crate::utils::errors::AppError;

/// Issuer claim stamped into every access token.
pub const TOKEN_ISSUER: &str = "auth-service";

pub fn create_access_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = now + jwt_config.access_token_expiry;

    let claims = Claims {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
        iss: TOKEN_ISSUER.to_string(),
        iat: now as usize,
        exp: exp as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign access token: {e}")))
}

/// Verifies a token and returns its claims.
///
/// Errors are [`AppError::TokenExpired`] for a well-signed token past its
/// expiry, and [`AppError::InvalidToken`] for everything else (bad
/// signature, wrong algorithm, malformed structure).
pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}
