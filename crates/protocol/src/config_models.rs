//! Server configuration models for `dlhub.toml`.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;
use ts_rs::TS;

/// Represents the settings from `dlhub.toml`.
///
/// # Example
///
/// ```toml
/// listen = "0.0.0.0:8080"
/// download_directory = "/srv/videos"
/// static_directory = "./static"
///
/// [tools]
/// yt_dlp = "/usr/local/bin/yt-dlp"
///
/// [output]
/// max_line_bytes = 65536
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct GlobalConfig {
    /// Socket address the HTTP server binds to.
    pub listen: String,

    /// Directory downloads are written to and files are served from.
    ///
    /// Also the working directory of every download process.
    #[ts(type = "string")]
    pub download_directory: PathBuf,

    /// Directory holding the built web UI.
    #[ts(type = "string")]
    pub static_directory: PathBuf,

    /// External tools.
    pub tools: ToolsConfig,

    /// Output capture and broadcast tuning.
    pub output: OutputConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            download_directory: PathBuf::from("./data"),
            static_directory: PathBuf::from("./static"),
            tools: ToolsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Executables invoked by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct ToolsConfig {
    /// Download tool executable (name on `PATH` or absolute path).
    pub yt_dlp: String,

    /// Value passed to the download tool's `-f` flag.
    pub yt_dlp_format: String,

    /// Audio extraction executable.
    pub ffmpeg: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp: "yt-dlp".to_string(),
            yt_dlp_format: "bestvideo*+bestaudio/best".to_string(),
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

/// Limits for output capture and subscriber channels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(default)]
pub struct OutputConfig {
    /// Longest output line kept; longer lines are replaced by an error line.
    pub max_line_bytes: usize,

    /// Extra capacity of a log subscription beyond the replayed history.
    pub subscriber_slack: usize,

    /// Capacity of each registry snapshot subscription.
    pub registry_subscriber_capacity: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 1024 * 1024,
            subscriber_slack: 100,
            registry_subscriber_capacity: 10,
        }
    }
}
