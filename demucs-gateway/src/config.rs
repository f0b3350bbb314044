//! Gateway configuration
//!
//! Resolved once at startup and injected into the router state. Nothing
//! reads the environment after that.

use std::path::PathBuf;

use clap::Parser;
use demucs_common::api::ApiKey;
use demucs_common::config::{CompiledDefaults, TomlConfig};

/// Command-line arguments for demucs-gateway
#[derive(Parser, Debug, Default)]
#[command(name = "demucs-gateway")]
#[command(about = "HTTP front-end for the demucs-separate tool")]
#[command(version, long_version = crate::LONG_VERSION)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "DEMUCS_GATEWAY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DEMUCS_GATEWAY_PORT")]
    pub port: Option<u16>,

    /// Separation tool to run for each job
    #[arg(long, env = "DEMUCS_TOOL")]
    pub tool: Option<String>,

    /// Model cache directory used for health and readiness
    #[arg(long, env = "DEMUCS_MODELS_DIR")]
    pub models_dir: Option<PathBuf>,

    /// Parent directory for per-job working directories
    #[arg(long, env = "DEMUCS_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "DEMUCS_GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Resolved gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub tool: String,
    pub models_dir: PathBuf,
    pub work_root: PathBuf,
    /// `None` disables authentication
    pub api_key: Option<ApiKey>,
}

impl GatewayConfig {
    /// Merge CLI/env arguments over the TOML file over compiled defaults
    pub fn resolve(args: &Args, file: Option<TomlConfig>, api_key: Option<&str>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = CompiledDefaults::default();

        Self {
            host: args.host.clone().or(file.host).unwrap_or(defaults.host),
            port: args.port.or(file.port).unwrap_or(defaults.port),
            tool: args.tool.clone().or(file.tool).unwrap_or(defaults.tool),
            models_dir: args
                .models_dir
                .clone()
                .or(file.models_dir)
                .unwrap_or(defaults.models_dir),
            work_root: args
                .work_dir
                .clone()
                .or(file.work_dir)
                .unwrap_or_else(std::env::temp_dir),
            api_key: ApiKey::from_optional(api_key),
        }
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
