//! API module for shared HTTP API functionality
//!
//! Contains ONLY pure functions and shared types. The gateway wraps these
//! with its Axum handlers.

pub mod auth;

pub use auth::{authorize, ApiAuthError, ApiKey};
