//! Application error taxonomy.
//!
//! Every error a handler can return is one of the variants below. The
//! mapping from variant to HTTP status and machine-readable code lives in
//! one place ([`AppError::status`] / [`AppError::code`]) and is matched
//! exhaustively, so adding a variant forces the boundary mapping to be
//! updated. Store-level errors are translated into these variants at the
//! repository layer; anything uncategorized becomes [`AppError::Internal`]
//! and is logged server-side without leaking detail to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request input.
    #[error("{0}")]
    Validation(String),

    /// Unique-constraint conflict, e.g. registering an email twice.
    #[error("{0}")]
    AlreadyExists(String),

    /// Login failure. Deliberately identical for unknown email and wrong
    /// password so responses cannot be used to enumerate accounts.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Bad signature, wrong algorithm, malformed token, or a refresh token
    /// that is unknown, expired, or already redeemed.
    #[error("invalid token")]
    InvalidToken,

    /// Access token with a valid signature whose expiry has passed.
    /// Distinguishable from [`AppError::InvalidToken`] so clients know to
    /// attempt a refresh instead of re-authenticating.
    #[error("token expired")]
    TokenExpired,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Uniform JSON error body: `{"error", "code"?, "details"?}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            AppError::Validation(_) => Some("VALIDATION_ERROR"),
            AppError::AlreadyExists(_) => Some("USER_EXISTS"),
            AppError::InvalidCredentials => Some("INVALID_CREDENTIALS"),
            AppError::InvalidToken => Some("INVALID_TOKEN"),
            AppError::TokenExpired => Some("TOKEN_EXPIRED"),
            AppError::NotFound(_) => Some("NOT_FOUND"),
            AppError::Unauthorized(_) => None,
            AppError::Forbidden(_) => None,
            AppError::Internal(_) => Some("INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal causes are logged here and never serialized outward.
        let message = match &self {
            AppError::Internal(cause) => {
                tracing::error!(error = ?cause, "Internal server error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: message,
            code: self.code().map(str::to_string),
            details: None,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}
