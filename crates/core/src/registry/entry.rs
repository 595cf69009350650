//! Registry-owned command records.

use crate::registry::error::RegistryError;
use crate::runner::ProcessRunner;
use chrono::{DateTime, Utc};
use dh_protocol::command_models::{CommandInfo, CommandStatus};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Identifier of a registered command, rendered as `cmd-N`.
///
/// Identifiers are allocated from a counter starting at 1 and are never
/// reused for the lifetime of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(pub u64);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0)
    }
}

impl FromStr for CommandId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("cmd-")
            .and_then(|n| n.parse::<u64>().ok())
            .map(CommandId)
            .ok_or_else(|| RegistryError::NotFound(s.to_string()))
    }
}

/// A tracked command.
///
/// The registry owns the entry; the entry only shares the runner, whose
/// lifecycle it does not control.
#[derive(Debug, Clone)]
pub struct CommandEntry {
    pub id: CommandId,
    pub label: String,
    pub status: CommandStatus,
    pub started_at: DateTime<Utc>,
    /// Set once the command has finished.
    pub exit_code: Option<i32>,
    pub runner: Arc<ProcessRunner>,
}

impl CommandEntry {
    /// Public projection used on the wire.
    pub fn to_info(&self) -> CommandInfo {
        CommandInfo {
            id: self.id.to_string(),
            label: self.label.clone(),
            status: self.status,
            started_at: self.started_at,
            exit_code: self.exit_code,
        }
    }
}
