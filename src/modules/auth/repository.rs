//! SQL access for refresh-token records.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::utils::errors::AppError;

pub struct TokenRepository;

impl TokenRepository {
    pub async fn create(
        db: &PgPool,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(db)
        .await?;

        Ok(())
    }

    /// Atomically redeems a refresh token: deletes the row if it exists and
    /// is unexpired, returning the owning user id. The conditional delete is
    /// a single statement, so under concurrent redemption of the same token
    /// exactly one caller observes `Some` and every other caller observes
    /// `None`. Not-found and expired are indistinguishable by design.
    pub async fn consume(db: &PgPool, token_hash: &str) -> Result<Option<i64>, AppError> {
        let user_id: Option<i64> = sqlx::query_scalar(
            "DELETE FROM refresh_tokens
             WHERE token_hash = $1 AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token_hash)
        .fetch_optional(db)
        .await?;

        Ok(user_id)
    }

    /// Deletes the matching record if present. Idempotent.
    pub async fn delete_by_hash(db: &PgPool, token_hash: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(db)
            .await?;

        Ok(())
    }

    pub async fn delete_by_user_id(db: &PgPool, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Purges expired rows. Advisory maintenance only: expired tokens are
    /// already rejected at redemption time.
    pub async fn delete_expired(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }
}
