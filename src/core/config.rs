//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.docchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DocchatConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.docchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".docchat").join("config.toml"))
}

/// Load config from `~/.docchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DocchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DocchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DocchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DocchatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: DocchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# DocChat Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8000"   # Or set DOCCHAT_BASE_URL env var
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env → CLI.
///
/// `cli_base_url` is the `--base-url` flag (None = not specified).
pub fn resolve(config: &DocchatConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("DOCCHAT_BASE_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // A trailing slash would double up when endpoint paths are appended.
    let base_url = base_url.trim_end_matches('/').to_string();

    ResolvedConfig { base_url }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = DocchatConfig::default();
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_resolve_uses_default_when_empty() {
        let config = DocchatConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_config_value_overrides_default() {
        let config = DocchatConfig {
            backend: BackendConfig {
                base_url: Some("http://192.168.1.10:8000".to_string()),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, "http://192.168.1.10:8000");
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = DocchatConfig {
            backend: BackendConfig {
                base_url: Some("http://from-file:8000".to_string()),
            },
        };
        let resolved = resolve(&config, Some("http://from-cli:9000"));
        assert_eq!(resolved.base_url, "http://from-cli:9000");
    }

    #[test]
    fn test_resolve_strips_trailing_slash() {
        let config = DocchatConfig::default();
        let resolved = resolve(&config, Some("http://localhost:8000/"));
        assert_eq!(resolved.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[backend]
base_url = "https://docchat.example.com"
"#;
        let config: DocchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("https://docchat.example.com")
        );
    }

    #[test]
    fn test_empty_toml_parses() {
        let config: DocchatConfig = toml::from_str("").unwrap();
        assert!(config.backend.base_url.is_none());
    }
}
