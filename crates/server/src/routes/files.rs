//! Download directory endpoints.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dh_core::jobs::ExtractOutcome;
use dh_protocol::api::{ExtractAudioResponse, MessageBody};
use dh_protocol::file_models::FileList;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::info;

const EXTRACT_AUDIO_SUFFIX: &str = "/extract-audio";

/// `GET /api/files`
pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileList>, ApiError> {
    let files = state.files().list()?;
    Ok(Json(FileList { files }))
}

/// `GET /api/files/{name}`
///
/// Supports conditional and range requests.
pub async fn download_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = state.files().existing(&name)?;
    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    Ok(response.into_response())
}

/// `DELETE /api/files/{name}`
pub async fn delete_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state.files().delete(&name)?;
    Ok(Json(MessageBody::new("File deleted successfully")))
}

/// `POST /api/files/{name}/extract-audio`
pub async fn extract_audio(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<ExtractAudioResponse>, ApiError> {
    let Some(name) = path.strip_suffix(EXTRACT_AUDIO_SUFFIX) else {
        return Err(ApiError::NotFound("Not found".to_string()));
    };
    info!(file = %name, "audio extraction requested");

    let response = match state.dispatcher().extract_audio(name).await? {
        ExtractOutcome::Started(id) => ExtractAudioResponse::Ok { id: id.to_string() },
        ExtractOutcome::Exists { filename, size } => ExtractAudioResponse::Exists {
            message: "MP3 file already exists".to_string(),
            download_url: format!("/api/files/{}", filename),
            filename,
            size,
        },
    };
    Ok(Json(response))
}
