//! # dh-server
//!
//! HTTP layer for dlhub.
//!
//! This crate provides:
//! - JSON endpoints for starting downloads, listing commands and managing
//!   files
//! - Server-Sent Event streams for command snapshots and command output
//! - Static serving of the web UI with an `index.html` fallback
//!
//! ## Modules
//!
//! - [`routes`]: Route handlers
//! - [`state`]: Shared application state
//! - [`error`]: API error responses

pub mod error;
pub mod routes;
pub mod state;

use anyhow::Context;
use axum::Router;
use dh_core::config::loader::prepare_download_directory;
use dh_core::files::FileStore;
use dh_core::jobs::Dispatcher;
use dh_core::registry::CommandRegistry;
use dh_core::runner::RunnerOptions;
use dh_protocol::config_models::GlobalConfig;
use state::AppState;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the full application router.
///
/// # Arguments
///
/// * `state` - Shared state handed to every handler
/// * `static_dir` - Directory of the built web UI
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    routes::api_routes()
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wire up state from configuration.
///
/// Creates the download directory if it does not exist yet.
pub fn build_state(config: &GlobalConfig) -> anyhow::Result<AppState> {
    let download_dir = prepare_download_directory(config)?;
    let registry = Arc::new(CommandRegistry::with_subscriber_capacity(
        config.output.registry_subscriber_capacity,
    ));
    let dispatcher = Dispatcher::new(
        registry,
        FileStore::new(download_dir),
        config.tools.clone(),
        RunnerOptions::from(&config.output),
    );
    Ok(AppState::new(dispatcher))
}

/// Run the HTTP server until the process is stopped.
pub async fn run_server(config: &GlobalConfig) -> anyhow::Result<()> {
    let state = build_state(config)?;

    if !config.static_directory.is_dir() {
        warn!(
            path = %config.static_directory.display(),
            "static directory not found; only the API will be useful"
        );
    }
    let app = build_router(state, &config.static_directory);

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid listen address '{}'", config.listen))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        addr = %addr,
        download_dir = %config.download_directory.display(),
        static_dir = %config.static_directory.display(),
        "dlhub listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
