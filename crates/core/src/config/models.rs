//! Overrides layered on top of the file configuration.
//!
//! Environment variables and command-line flags both produce a
//! `ConfigOverrides`; later layers win.

use dh_protocol::config_models::GlobalConfig;
use std::path::PathBuf;

/// Environment variable overriding `download_directory`.
pub const ENV_DOWNLOAD_DIRECTORY: &str = "DOWNLOAD_DIRECTORY";

/// Environment variable overriding `static_directory`.
pub const ENV_STATIC_DIRECTORY: &str = "STATIC_DIRECTORY";

/// Environment variable overriding `listen`.
pub const ENV_LISTEN: &str = "DLHUB_LISTEN";

/// Optional replacements for individual settings.
///
/// Empty strings are treated as unset, matching how the environment is
/// usually cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub download_directory: Option<PathBuf>,
    pub static_directory: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Collect overrides through a variable lookup function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dh_core::config::models::ConfigOverrides;
    ///
    /// let overrides = ConfigOverrides::from_lookup(|key| std::env::var(key).ok());
    /// # let _ = overrides;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            listen: non_empty(ENV_LISTEN),
            download_directory: non_empty(ENV_DOWNLOAD_DIRECTORY).map(PathBuf::from),
            static_directory: non_empty(ENV_STATIC_DIRECTORY).map(PathBuf::from),
        }
    }

    /// Overrides taken from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Write every set value into `config`.
    pub fn apply(&self, config: &mut GlobalConfig) {
        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(dir) = &self.download_directory {
            config.download_directory = dir.clone();
        }
        if let Some(dir) = &self.static_directory {
            config.static_directory = dir.clone();
        }
    }
}
