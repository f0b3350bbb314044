//! Configuration loading
//!
//! Values are resolved in priority order:
//! 1. Command-line argument / its environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! The API key is the exception: it only ever comes from [`API_KEY_ENV`].

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable holding the optional shared API key
pub const API_KEY_ENV: &str = "CEREBRIUM_API_KEY";

/// Compiled defaults used when neither CLI nor TOML provide a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub tool: String,
    pub models_dir: PathBuf,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8192,
            tool: "demucs-separate".to_string(),
            models_dir: PathBuf::from("/models-cache"),
        }
    }
}

/// Contents of the optional TOML config file
///
/// Every key is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tool: Option<String>,
    pub models_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

/// Load a TOML config file
///
/// A missing file is not an error: it yields `Ok(None)` and a warning so the
/// service still starts on defaults. A file that exists but cannot be read or
/// parsed is an error.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Config file not found at {} (using defaults)", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(Error::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let config = TomlConfig::parse(&content)
        .map_err(|Error::Config(msg)| Error::Config(format!("{} ({})", msg, path.display())))?;
    debug!("Loaded config file {}", path.display());
    Ok(Some(config))
}

/// Find the platform config file, if one exists
///
/// Checks `~/.config/demucs-gateway/config.toml` then
/// `/etc/demucs-gateway/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("demucs-gateway").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/demucs-gateway/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Read the shared API key from the environment
///
/// Absent or empty disables authentication.
pub fn load_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_toml() {
        let config = TomlConfig::parse("port = 9000\ntool = \"/opt/bin/demucs-separate\"\n").unwrap();
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.tool.as_deref(), Some("/opt/bin/demucs-separate"));
        assert!(config.host.is_none());
        assert!(config.models_dir.is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let err = TomlConfig::parse("port = \"not a number\"").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Invalid TOML: "));
    }

    #[test]
    fn test_defaults() {
        let defaults = CompiledDefaults::default();
        assert_eq!(defaults.tool, "demucs-separate");
        assert_eq!(defaults.models_dir, PathBuf::from("/models-cache"));
        assert_eq!(defaults.port, 8192);
    }
}
