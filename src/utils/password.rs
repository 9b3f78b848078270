use anyhow::anyhow;

use crate::config::password::PasswordConfig;
use crate::utils::errors::AppError;

pub fn hash_password(password: &str, config: &PasswordConfig) -> Result<String, AppError> {
    bcrypt::hash(password, config.cost)
        .map_err(|e| AppError::Internal(anyhow!("failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::Internal(anyhow!("failed to verify password: {e}")))
}
