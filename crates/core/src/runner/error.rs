//! Error types for process execution.
//!
//! Only failures the caller can act on are surfaced here. Problems reading
//! a child's output are absorbed into its history instead, and abnormal
//! termination is reported through the exit code.

use thiserror::Error;

/// Errors returned by [`ProcessRunner`](super::ProcessRunner).
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The OS could not create the pipes or spawn the child.
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    /// Waiting on the child failed at the OS level.
    #[error("Failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
}

/// Type alias for Result with RunnerError.
pub type RunnerResult<T> = Result<T, RunnerError>;
