//! demucs-gateway library
//!
//! HTTP front-end that runs the pre-installed `demucs-separate` tool for each
//! submitted job and reports how it exited. Separation and result upload are
//! entirely the tool's business.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod job;
pub mod models;

pub use config::{Args, GatewayConfig};

/// Version plus build identification, shown by `--version` and at startup
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " [",
    env!("GIT_HASH"),
    "] ",
    env!("BUILD_TARGET"),
    " ",
    env!("BUILD_PROFILE"),
    " built ",
    env!("BUILD_TIMESTAMP"),
);

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only configuration resolved at startup
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/run", post(api::run_job))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_carries_build_info() {
        assert!(LONG_VERSION.starts_with(concat!(env!("CARGO_PKG_VERSION"), " [")));
        assert!(LONG_VERSION.contains(env!("BUILD_TARGET")));
        assert!(LONG_VERSION.ends_with(env!("BUILD_TIMESTAMP")));
    }
}
