//! dlhub - download server for yt-dlp with live command logs.
//!
//! # Usage
//!
//! ```bash
//! # Start the server (default subcommand)
//! dlhub
//! dlhub serve --listen 127.0.0.1:9000 --download-dir /srv/videos
//!
//! # Verify the external tools are installed
//! dlhub check
//! ```

mod commands;
mod logging;

use clap::{Args, Parser, Subcommand};
use dh_core::config::models::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dlhub")]
#[command(about = "Download server for yt-dlp with live command logs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log filter such as `debug` or `dh_core=trace` (overrides DLHUB_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(ConfigArgs),

    /// Check that the configured tools are installed
    Check(ConfigArgs),
}

/// Flags shared by every subcommand that reads configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Configuration file (default: ./dlhub.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,

    /// Directory downloads are written to
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Directory containing the web UI
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

impl ConfigArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen: self.listen.clone(),
            download_directory: self.download_dir.clone(),
            static_directory: self.static_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;

    match cli.command {
        Some(Commands::Check(args)) => commands::check(&args),
        Some(Commands::Serve(args)) => commands::serve(&args).await,
        None => commands::serve(&ConfigArgs::default()).await,
    }
}
