//! API routes.
//!
//! - `POST /api/yt-dlp` - start a download
//! - `GET /api/commands` - list commands
//! - `GET /api/commands/stream` - SSE feed of command snapshots
//! - `GET /api/commands/{id}/logs` - captured output of one command
//! - `GET /api/commands/{id}/logs/stream` - SSE feed of one command's output
//! - `GET /api/files` - list downloaded files
//! - `GET|DELETE /api/files/{name}` - download or delete a file
//! - `POST /api/files/{name}/extract-audio` - convert a file to MP3

pub mod commands;
pub mod download;
pub mod files;

use crate::error::ApiError;
use crate::state::AppState;
use axum::routing::{any, get, post};
use axum::Router;

/// Create all `/api` routes.
///
/// Unknown paths under `/api` answer with a JSON 404 instead of reaching the
/// static file fallback.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/yt-dlp", post(download::start_download))
        .route("/api/commands", get(commands::list_commands))
        .route("/api/commands/stream", get(commands::stream_commands))
        .route("/api/commands/{id}/logs", get(commands::command_logs))
        .route("/api/commands/{id}/logs/stream", get(commands::stream_command_logs))
        .route("/api/files", get(files::list_files))
        .route(
            "/api/files/{*name}",
            get(files::download_file)
                .delete(files::delete_file)
                .post(files::extract_audio),
        )
        .route("/api", any(api_not_found))
        .route("/api/{*rest}", any(api_not_found))
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
