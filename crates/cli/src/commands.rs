//! Subcommand implementations.

use crate::ConfigArgs;
use color_eyre::eyre::{bail, eyre};
use colored::Colorize;
use dh_core::config::loader::{
    load_config, load_config_or_default, resolve_config, DEFAULT_CONFIG_FILE,
};
use dh_core::config::models::ConfigOverrides;
use dh_protocol::config_models::GlobalConfig;
use std::path::Path;
use tracing::debug;

/// Resolve configuration: defaults, file, environment, then flags.
fn load(args: &ConfigArgs) -> color_eyre::Result<GlobalConfig> {
    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => load_config_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let config = resolve_config(base, &[ConfigOverrides::from_env(), args.overrides()])?;
    debug!(?config, "configuration resolved");
    Ok(config)
}

/// `dlhub serve`
pub async fn serve(args: &ConfigArgs) -> color_eyre::Result<()> {
    let config = load(args)?;
    dh_server::run_server(&config)
        .await
        .map_err(|e| eyre!(e))
}

/// `dlhub check`
///
/// Fails if any configured tool cannot be found on `PATH`.
pub fn check(args: &ConfigArgs) -> color_eyre::Result<()> {
    let config = load(args)?;
    let tools = [
        ("yt-dlp", config.tools.yt_dlp.as_str()),
        ("ffmpeg", config.tools.ffmpeg.as_str()),
    ];

    let mut missing = 0;
    for (name, program) in tools {
        match which::which(program) {
            Ok(path) => println!("{} {:<8} {}", "ok".green().bold(), name, path.display()),
            Err(_) => {
                missing += 1;
                println!("{} {:<8} '{}' not found", "missing".red().bold(), name, program);
            }
        }
    }

    for (name, dir) in [
        ("downloads", &config.download_directory),
        ("static", &config.static_directory),
    ] {
        let state = if dir.is_dir() {
            "exists".green()
        } else {
            "absent".yellow()
        };
        println!("{:<10} {} ({})", name, dir.display(), state);
    }

    if missing > 0 {
        bail!("{} required tool(s) not found", missing);
    }
    Ok(())
}
