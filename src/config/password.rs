use std::env;

#[derive(Clone, Debug)]
pub struct PasswordConfig {
    /// bcrypt work factor. Higher costs slow down brute-force attacks but
    /// also slow down every login.
    pub cost: u32,
}

impl PasswordConfig {
    pub fn from_env() -> Self {
        Self {
            cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        }
    }
}
