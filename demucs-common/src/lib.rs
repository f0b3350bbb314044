//! # Demucs Common Library
//!
//! Shared code for the demucs gateway workspace:
//! - Error and result types
//! - Configuration loading (TOML file, compiled defaults, API key)
//! - API key comparison

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
