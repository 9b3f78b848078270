use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::config::password::PasswordConfig;
use crate::modules::users::model::{NewUser, User};
use crate::modules::users::repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, verify_access_token};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::token::{generate_refresh_token, hash_refresh_token};

use super::model::{AuthResponse, Claims, LoginRequest, RegisterRequest};
use super::repository::TokenRepository;

pub struct AuthService;

impl AuthService {
    /// Registers a new user with role `user`. A taken email surfaces as
    /// `AlreadyExists` via the store's unique constraint.
    #[instrument(skip(db, password_config, dto), fields(email = %dto.email))]
    pub async fn register(
        db: &PgPool,
        password_config: &PasswordConfig,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        let password_hash = hash_password(&dto.password, password_config)?;

        UserRepository::create(
            db,
            NewUser {
                email: dto.email,
                password_hash,
                name: dto.name,
            },
        )
        .await
    }

    /// Verifies credentials and issues a token pair. Unknown email and
    /// wrong password both return `InvalidCredentials` so responses cannot
    /// be used to enumerate accounts.
    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let user = UserRepository::find_by_email(db, &dto.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&dto.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        Self::issue_token_pair(db, jwt_config, &user).await
    }

    /// Redeems a refresh token for a fresh token pair. Rotation is strict
    /// and forward-only: the old record is deleted in the same atomic store
    /// operation that looks it up, so a token can be redeemed at most once.
    /// Unknown, expired, and already-redeemed tokens all collapse to
    /// `InvalidToken`.
    #[instrument(skip_all)]
    pub async fn refresh_tokens(
        db: &PgPool,
        jwt_config: &JwtConfig,
        refresh_token: &str,
    ) -> Result<AuthResponse, AppError> {
        let token_hash = hash_refresh_token(refresh_token);

        let user_id = TokenRepository::consume(db, &token_hash)
            .await?
            .ok_or(AppError::InvalidToken)?;

        // The owner can disappear between issuance and redemption; the
        // token is then no longer redeemable.
        let user = UserRepository::find_by_id(db, user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Self::issue_token_pair(db, jwt_config, &user).await
    }

    /// Thin wrapper over the token codec, kept so callers outside the HTTP
    /// layer can verify tokens without reaching into `utils`.
    pub fn validate_access_token(
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<Claims, AppError> {
        verify_access_token(token, jwt_config)
    }

    /// Deletes the matching refresh token. Idempotent: logging out with an
    /// unknown token is not an error.
    #[instrument(skip_all)]
    pub async fn logout(db: &PgPool, refresh_token: &str) -> Result<(), AppError> {
        let token_hash = hash_refresh_token(refresh_token);
        TokenRepository::delete_by_hash(db, &token_hash).await
    }

    /// Deletes every refresh token owned by the user, ending all of their
    /// sessions at once.
    #[instrument(skip(db))]
    pub async fn logout_all(db: &PgPool, user_id: i64) -> Result<(), AppError> {
        TokenRepository::delete_by_user_id(db, user_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_user_by_id(db: &PgPool, user_id: i64) -> Result<User, AppError> {
        UserRepository::find_by_id(db, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    /// Shared by login and refresh: one signed access token plus one opaque
    /// refresh token whose digest is persisted with a TTL-derived expiry.
    async fn issue_token_pair(
        db: &PgPool,
        jwt_config: &JwtConfig,
        user: &User,
    ) -> Result<AuthResponse, AppError> {
        let access_token = create_access_token(user, jwt_config)?;

        let refresh_token = generate_refresh_token();
        let token_hash = hash_refresh_token(&refresh_token);
        let expires_at = Utc::now() + Duration::seconds(jwt_config.refresh_token_expiry);

        TokenRepository::create(db, user.id, &token_hash, expires_at).await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: jwt_config.access_token_expiry,
        })
    }
}
