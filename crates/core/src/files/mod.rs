//! Access to the download directory.
//!
//! Every name handed in from the outside is resolved through
//! [`FileStore::resolve`], which keeps paths inside the root.

use chrono::{DateTime, Utc};
use dh_protocol::file_models::FileInfo;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Errors that can occur while accessing the download directory.
#[derive(Error, Debug)]
pub enum FileError {
    /// Empty, absolute, or escaping the root via `..`.
    #[error("Invalid filename: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to list files in {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Type alias for Result with FileError.
pub type FileResult<T> = Result<T, FileError>;

/// The download directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All regular files below the root, sorted by relative name.
    ///
    /// A missing root yields an empty list.
    pub fn list(&self) -> FileResult<Vec<FileInfo>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(|source| FileError::Walk {
                path: self.root.clone(),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = entry.metadata().map_err(|source| FileError::Walk {
                path: entry.path().to_path_buf(),
                source,
            })?;

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };

            files.push(FileInfo {
                name: relative_name(relative),
                size: metadata.len(),
                mod_time: modified_at(&metadata),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Map a client-supplied name to a path inside the root.
    ///
    /// The file does not have to exist.
    ///
    /// # Errors
    ///
    /// Returns `FileError::InvalidName` for empty names, absolute paths and
    /// any name containing `..`.
    pub fn resolve(&self, name: &str) -> FileResult<PathBuf> {
        let trimmed = name.trim_start_matches('/');
        if trimmed.is_empty() || name.contains("..") {
            return Err(FileError::InvalidName(name.to_string()));
        }

        let relative = Path::new(trimmed);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(FileError::InvalidName(name.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Resolve a name to an existing regular file.
    pub fn existing(&self, name: &str) -> FileResult<PathBuf> {
        let path = self.resolve(name)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(FileError::NotFound(name.to_string()))
        }
    }

    /// Size and modification time of an existing file.
    pub fn metadata(&self, name: &str) -> FileResult<FileInfo> {
        let path = self.existing(name)?;
        let metadata = std::fs::metadata(&path).map_err(|source| FileError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(FileInfo {
            name: name.trim_start_matches('/').to_string(),
            size: metadata.len(),
            mod_time: modified_at(&metadata),
        })
    }

    /// Remove a file from the download directory.
    pub fn delete(&self, name: &str) -> FileResult<()> {
        let path = self.existing(name)?;
        std::fs::remove_file(&path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "failed to delete file");
            FileError::Io {
                path: path.clone(),
                source,
            }
        })?;

        info!(path = %path.display(), "file deleted");
        Ok(())
    }
}

fn relative_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn modified_at(metadata: &std::fs::Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}
