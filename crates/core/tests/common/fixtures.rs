//! Test fixtures for runners, registries and dispatchers.

use dh_core::files::FileStore;
use dh_core::jobs::Dispatcher;
use dh_core::registry::CommandRegistry;
use dh_core::runner::{ProcessRunner, RunnerOptions};
use dh_protocol::config_models::ToolsConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A runner executing `script` through `sh -c` in the temp directory.
#[allow(dead_code)]
pub fn sh(script: &str) -> ProcessRunner {
    ProcessRunner::new("sh", ["-c", script], std::env::temp_dir())
}

/// Path to one of the fake tool scripts in `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_tool(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Tools pointing at the fake yt-dlp and ffmpeg scripts.
#[allow(dead_code)]
pub fn fake_tools() -> ToolsConfig {
    ToolsConfig {
        yt_dlp: fixture_tool("fake-yt-dlp").to_string_lossy().into_owned(),
        yt_dlp_format: "worst".to_string(),
        ffmpeg: fixture_tool("fake-ffmpeg").to_string_lossy().into_owned(),
    }
}

/// A dispatcher over a fresh download directory.
///
/// Returns the TempDir, which must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_dispatcher(tools: ToolsConfig) -> (TempDir, Dispatcher) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dispatcher = Dispatcher::new(
        Arc::new(CommandRegistry::new()),
        FileStore::new(dir.path()),
        tools,
        RunnerOptions::default(),
    );
    (dir, dispatcher)
}
