//! SQL access for user records.
//!
//! Store-specific failures are translated into [`AppError`] variants here,
//! at the repository boundary: a unique-constraint violation on email
//! surfaces as `AlreadyExists`, anything else as an opaque internal error.

use sqlx::PgPool;

use crate::utils::errors::AppError;

use super::model::{NewUser, User};

pub struct UserRepository;

impl UserRepository {
    /// Inserts a new user with role `user`. Concurrent registrations racing
    /// on the same email are resolved by the store's unique constraint:
    /// exactly one insert wins, the loser observes `AlreadyExists`.
    pub async fn create(db: &PgPool, new_user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, name, role)
             VALUES ($1, $2, $3, 'user')
             RETURNING id, email, password_hash, name, role, created_at, updated_at",
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.name)
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::AlreadyExists("user with this email already exists".to_string())
            }
            _ => AppError::from(e),
        })
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }
}
