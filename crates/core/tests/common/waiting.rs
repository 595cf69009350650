//! Helpers that wait for background work to settle.

use dh_core::registry::{CommandEntry, CommandId, CommandRegistry};
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound for anything a test waits on.
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll the registry until the command reaches a terminal status.
#[allow(dead_code)]
pub async fn wait_until_finished(registry: &CommandRegistry, id: CommandId) -> CommandEntry {
    tokio::time::timeout(TEST_TIMEOUT, async {
        loop {
            let entry = registry.lookup(id).expect("command should be registered");
            if entry.status.is_terminal() {
                return entry;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("command did not finish in time")
}

/// Receive every line until the channel closes.
#[allow(dead_code)]
pub async fn collect_lines(mut rx: mpsc::Receiver<String>) -> Vec<String> {
    tokio::time::timeout(TEST_TIMEOUT, async {
        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        lines
    })
    .await
    .expect("output stream did not close in time")
}
