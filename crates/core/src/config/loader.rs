//! Configuration file loader for `dlhub.toml`.
//!
//! Settings are layered in this order, later layers winning:
//! 1. Built-in defaults
//! 2. The TOML file
//! 3. Environment variables (`DOWNLOAD_DIRECTORY`, `STATIC_DIRECTORY`,
//!    `DLHUB_LISTEN`)
//! 4. Command-line flags

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::ConfigOverrides;
use dh_protocol::config_models::GlobalConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up when no `--config` flag is given.
pub const DEFAULT_CONFIG_FILE: &str = "dlhub.toml";

/// Loads configuration from a TOML file that must exist.
///
/// Missing keys fall back to their defaults.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file cannot be read
/// - The file has invalid TOML syntax or wrongly typed values
pub fn load_config(path: &Path) -> ConfigResult<GlobalConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: GlobalConfig = toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> ConfigResult<GlobalConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(GlobalConfig::default());
    }
    load_config(path)
}

/// Apply override layers in order and validate the result.
///
/// # Arguments
///
/// * `config` - Configuration read from file (or defaults)
/// * `layers` - Overrides, lowest precedence first
pub fn resolve_config(mut config: GlobalConfig, layers: &[ConfigOverrides]) -> ConfigResult<GlobalConfig> {
    for layer in layers {
        layer.apply(&mut config);
    }
    validate(&config)?;
    Ok(config)
}

/// Check values that serde cannot check.
pub fn validate(config: &GlobalConfig) -> ConfigResult<()> {
    config
        .listen
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidConfig {
            reason: format!("listen address '{}' is invalid: {}", config.listen, e),
        })?;

    let tools = [
        ("tools.yt_dlp", &config.tools.yt_dlp),
        ("tools.yt_dlp_format", &config.tools.yt_dlp_format),
        ("tools.ffmpeg", &config.tools.ffmpeg),
    ];
    for (key, value) in tools {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                reason: format!("{} must not be empty", key),
            });
        }
    }

    if config.output.max_line_bytes == 0 {
        return Err(ConfigError::InvalidConfig {
            reason: "output.max_line_bytes must be greater than 0".to_string(),
        });
    }

    Ok(())
}

/// Create the download directory if needed and return its absolute path.
///
/// The returned path is what processes use as their working directory.
pub fn prepare_download_directory(config: &GlobalConfig) -> ConfigResult<PathBuf> {
    let dir = &config.download_directory;
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDirectory {
        path: dir.clone(),
        source,
    })?;

    let absolute = dir.canonicalize().map_err(|source| ConfigError::CreateDirectory {
        path: dir.clone(),
        source,
    })?;

    info!(path = %absolute.display(), "download directory ready");
    Ok(absolute)
}
