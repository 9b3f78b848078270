use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserResponse;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorBody};
use crate::validator::ValidatedJson;

use super::model::{AuthResponse, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest};
use super::service::AuthService;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::register(&state.db, &state.password_config, dto).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Login and receive an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = AuthResponse),
        (status = 400, description = "Missing refresh_token", body = ErrorBody),
        (status = 401, description = "Unknown, expired, or already-redeemed token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response =
        AuthService::refresh_tokens(&state.db, &state.jwt_config, &dto.refresh_token).await?;
    Ok(Json(response))
}

/// Logout by invalidating a refresh token
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Logged out (idempotent)", body = MessageResponse),
        (status = 400, description = "Missing refresh_token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::logout(&state.db, &dto.refresh_token).await?;
    Ok(Json(MessageResponse {
        message: "successfully logged out".to_string(),
    }))
}

/// Logout everywhere by invalidating all of the caller's refresh tokens
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout-all",
    responses(
        (status = 200, description = "All sessions ended", body = MessageResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(user_id = auth_user.user_id))]
pub async fn logout_all(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::logout_all(&state.db, auth_user.user_id).await?;
    Ok(Json(MessageResponse {
        message: "successfully logged out of all sessions".to_string(),
    }))
}

/// Current user information
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token", body = ErrorBody),
        (status = 404, description = "User deleted after token issuance", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(user_id = auth_user.user_id))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = AuthService::get_user_by_id(&state.db, auth_user.user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}
