//! Background task recording a command's outcome in the registry.

use crate::registry::{CommandId, CommandRegistry};
use crate::runner::ProcessRunner;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the watcher for a registered command.
///
/// The task forwards the command's output to `tracing` at debug level,
/// waits for the process to exit and drain, and then calls
/// [`CommandRegistry::mark_finished`] exactly once.
pub fn spawn_watcher(
    registry: Arc<CommandRegistry>,
    id: CommandId,
    runner: Arc<ProcessRunner>,
) -> JoinHandle<()> {
    // Subscribe before spawning so no history is missed.
    let mut output = runner.subscribe_output();

    tokio::spawn(async move {
        while let Some(line) = output.recv().await {
            debug!(command_id = %id, "{}", line);
        }

        if let Err(e) = runner.wait().await {
            warn!(command_id = %id, error = %e, "wait failed");
        }

        if let Err(e) = registry.mark_finished(id, runner.exit_code()) {
            warn!(command_id = %id, error = %e, "could not record command outcome");
        }
    })
}
