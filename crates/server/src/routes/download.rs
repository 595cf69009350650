//! Download endpoint.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use dh_protocol::api::{CommandStarted, DownloadRequest};
use tracing::info;

/// `POST /api/yt-dlp`
///
/// Launches the download tool in the background and answers as soon as the
/// command is registered.
pub async fn start_download(
    State(state): State<AppState>,
    body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<CommandStarted>, ApiError> {
    let Json(request) = body?;
    info!(url = %request.url, "download requested");

    let id = state.dispatcher().start_download(&request.url).await?;
    Ok(Json(CommandStarted::ok(id.to_string())))
}
