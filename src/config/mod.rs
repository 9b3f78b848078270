//! Configuration modules for the auth service.
//!
//! Each submodule handles one aspect of configuration, loaded once from
//! environment variables at process start and immutable thereafter.
//!
//! # Modules
//!
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: Signing secret and token TTLs
//! - [`password`]: bcrypt work factor
//! - [`server`]: Bind address and shutdown grace period

pub mod database;
pub mod jwt;
pub mod password;
pub mod server;
