//! HTTP request and response bodies.
//!
//! This module defines the JSON envelopes exchanged with the web client.
//! Streaming endpoints use Server-Sent Events whose `data:` payloads are
//! also defined here.
//!
//! ```json
//! // POST /api/yt-dlp
//! { "url": "https://example.com/watch?v=abc" }
//!
//! // response
//! { "status": "ok", "id": "cmd-1" }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Name of the SSE event sent once a log stream has been fully delivered.
pub const LOG_STREAM_DONE_EVENT: &str = "done";

/// Body of `POST /api/yt-dlp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct DownloadRequest {
    /// URL handed to the download tool.
    pub url: String,
}

/// Response sent once a command has been launched and registered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct CommandStarted {
    /// Always `"ok"`.
    pub status: String,
    /// Registry identifier of the new command.
    pub id: String,
}

impl CommandStarted {
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            id: id.into(),
        }
    }
}

/// Response body of `GET /api/commands/{id}/logs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct CommandLogs {
    pub id: String,
    /// Every output line captured so far, in arrival order.
    pub logs: Vec<String>,
}

/// Payload of one `data:` event on `/api/commands/{id}/logs/stream`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct LogLine {
    pub line: String,
}

/// Response body of `POST /api/files/{name}/extract-audio`.
///
/// Tagged by `status`:
/// ```json
/// { "status": "ok", "id": "cmd-4" }
/// { "status": "exists", "message": "...", "filename": "a.mp3", "size": 1024, "download_url": "/api/files/a.mp3" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractAudioResponse {
    /// An ffmpeg command was launched.
    Ok { id: String },

    /// The MP3 already exists; nothing was launched.
    Exists {
        message: String,
        filename: String,
        #[ts(type = "number")]
        size: u64,
        download_url: String,
    },
}

/// Generic error envelope: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Generic success envelope: `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
