//! Shared utilities.
//!
//! - [`errors`]: application error taxonomy and HTTP mapping
//! - [`jwt`]: access-token creation and verification
//! - [`password`]: bcrypt hashing and verification
//! - [`token`]: opaque refresh-token generation and digesting

pub mod errors;
pub mod jwt;
pub mod password;
pub mod token;
