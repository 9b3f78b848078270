use linktrack_auth::config::jwt::JwtConfig;
use linktrack_auth::config::password::PasswordConfig;
use linktrack_auth::router::init_router;
use linktrack_auth::state::AppState;
use linktrack_auth::utils::password::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

#[allow(dead_code)]
pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

#[allow(dead_code)]
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    }
}

/// Builds the full router over an AppState with test config. bcrypt cost is
/// the minimum so registration-heavy tests stay fast.
#[allow(dead_code)]
pub fn setup_test_app(pool: PgPool) -> axum::Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        password_config: PasswordConfig { cost: 4 },
    };
    init_router(state)
}

/// Router sharing the test state but issuing already-expired access tokens.
#[allow(dead_code)]
pub fn setup_test_app_with_expired_tokens(pool: PgPool) -> axum::Router {
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig {
            access_token_expiry: -100,
            ..test_jwt_config()
        },
        password_config: PasswordConfig { cost: 4 },
    };
    init_router(state)
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("user-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
}

/// Inserts a user directly, bypassing the HTTP surface.
#[allow(dead_code)]
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str, role: &str) -> TestUser {
    let hashed = hash_password(password, &PasswordConfig { cost: 4 }).unwrap();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, name, role)
         VALUES ($1, $2, 'Test User', $3)
         RETURNING id",
    )
    .bind(email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}
