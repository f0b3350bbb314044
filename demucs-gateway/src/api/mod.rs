//! HTTP API handlers for demucs-gateway

pub mod health;
pub mod run;

pub use health::health_routes;
pub use run::run_job;
