//! Tracked command models.
//!
//! This module defines the public projection of a command tracked by the
//! registry, as it is listed by `GET /api/commands` and pushed over the
//! `/api/commands/stream` SSE endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle status of a tracked command.
///
/// Status only ever moves forward:
/// Running -> Completed | Failed
///
/// Both terminal states are final.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    /// The external process is still running or its output is still draining.
    Running,

    /// The process exited with code 0.
    Completed,

    /// The process exited with a nonzero code or was killed by a signal.
    Failed,
}

impl CommandStatus {
    /// Derive the terminal status for a resolved exit code.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            CommandStatus::Completed
        } else {
            CommandStatus::Failed
        }
    }

    /// Whether no further transition can happen from this status.
    pub fn is_terminal(self) -> bool {
        !matches!(self, CommandStatus::Running)
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandStatus::Running => write!(f, "running"),
            CommandStatus::Completed => write!(f, "completed"),
            CommandStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Public state of a single tracked command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct CommandInfo {
    /// Registry identifier, e.g. `cmd-3`.
    pub id: String,

    /// Descriptive label: the downloaded URL, or a description of the
    /// operation such as `Extract audio: clip.webm`.
    ///
    /// Serialized as `url` for compatibility with the web client.
    #[serde(rename = "url")]
    pub label: String,

    /// Current lifecycle status.
    pub status: CommandStatus,

    /// When the command was registered.
    #[ts(type = "string")]
    pub started_at: DateTime<Utc>,

    /// Exit code, present once the command has finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub exit_code: Option<i32>,
}

/// Full registry snapshot.
///
/// Used both as the `GET /api/commands` response body and as the payload of
/// every event on the commands SSE stream.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct CommandList {
    pub commands: Vec<CommandInfo>,
}
