//! External process execution with replayable, multi-consumer output.
//!
//! This module provides:
//! - [`ProcessRunner`]: launches one process, captures stdout and stderr
//!   into a shared history and fans lines out to subscribers
//! - [`RunnerOptions`]: line length and subscriber buffer limits
//! - [`RunnerError`]: launch and wait failures

pub mod error;
mod lines;
mod output;
pub mod process;

pub use error::{RunnerError, RunnerResult};
pub use process::{ProcessRunner, RunnerState, ABNORMAL_EXIT_CODE, UNKNOWN_EXIT_CODE};

use dh_protocol::config_models::OutputConfig;

/// Limits applied while capturing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Longest line kept in history; longer lines become an error line.
    pub max_line_bytes: usize,

    /// Live-line buffer each subscriber gets beyond the replayed history.
    pub subscriber_slack: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::from(&OutputConfig::default())
    }
}

impl From<&OutputConfig> for RunnerOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            max_line_bytes: config.max_line_bytes,
            subscriber_slack: config.subscriber_slack,
        }
    }
}
