//! Request-pipeline middleware.
//!
//! - [`auth`]: bearer-token extractor injecting verified identity into
//!   handlers

pub mod auth;
