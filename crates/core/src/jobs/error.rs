//! Error types for job dispatch.

use crate::files::FileError;
use crate::runner::RunnerError;
use thiserror::Error;

/// Errors returned by [`Dispatcher`](super::Dispatcher).
#[derive(Error, Debug)]
pub enum JobError {
    /// The request is missing required input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The file to extract audio from does not exist.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    #[error(transparent)]
    File(#[from] FileError),

    /// The tool could not be started. Nothing was registered.
    #[error(transparent)]
    Launch(#[from] RunnerError),
}

/// Type alias for Result with JobError.
pub type JobResult<T> = Result<T, JobError>;
