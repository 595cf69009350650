//! API error handling.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a
//! matching status code.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dh_core::files::FileError;
use dh_core::jobs::JobError;
use dh_core::registry::RegistryError;
use dh_protocol::api::ErrorBody;
use thiserror::Error;
use tracing::warn;

/// API error type.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::InvalidName(_) => ApiError::BadRequest("Invalid filename".to_string()),
            FileError::NotFound(_) => ApiError::NotFound("File not found".to_string()),
            FileError::Walk { .. } => ApiError::Internal(format!("Failed to list files: {}", err)),
            FileError::Io { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            JobError::SourceNotFound(_) => ApiError::NotFound("Source file not found".to_string()),
            JobError::File(e) => e.into(),
            JobError::Launch(e) => ApiError::Internal(format!("Error executing command: {}", e)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Error decoding body: {}", rejection.body_text()))
    }
}
