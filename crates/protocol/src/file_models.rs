//! Download-directory listing models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A regular file found under the download directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct FileInfo {
    /// Path relative to the download directory, `/`-separated.
    pub name: String,

    /// Size in bytes.
    #[ts(type = "number")]
    pub size: u64,

    /// Last modification time.
    #[ts(type = "string")]
    pub mod_time: DateTime<Utc>,
}

/// Response body of `GET /api/files`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct FileList {
    pub files: Vec<FileInfo>,
}
