//! demucs-gateway - Main entry point
//!
//! Serves `/run`, `/health` and `/ready`. Each `/run` call launches the
//! separation tool in its own temporary directory.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demucs_common::config::{default_config_path, load_api_key, load_toml_config};
use demucs_gateway::{build_router, AppState, Args, GatewayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demucs_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before anything can stall
    info!("Starting demucs-gateway {}", demucs_gateway::LONG_VERSION);

    let args = Args::parse();

    let file_config = match args.config.clone().or_else(default_config_path) {
        Some(path) => {
            info!("Config file: {}", path.display());
            load_toml_config(&path).context("Failed to load config file")?
        }
        None => None,
    };

    let api_key = load_api_key();
    let config = GatewayConfig::resolve(&args, file_config, api_key.as_deref());

    info!("Separation tool: {}", config.tool);
    info!("Model cache: {}", config.models_dir.display());
    info!("Job directories under: {}", config.work_root.display());
    if config.api_key.is_some() {
        info!("API key authentication enabled");
    } else {
        info!("API key authentication disabled (no key configured)");
    }

    let addr = config.bind_addr();
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
