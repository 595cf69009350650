//! Command registry for tracking every launched process.
//!
//! The CommandRegistry is the single owner of all command entries. It
//! assigns identifiers, records status transitions reported by watchers and
//! pushes full snapshots to any number of subscribers.

use crate::registry::entry::{CommandEntry, CommandId};
use crate::registry::error::{RegistryError, RegistryResult};
use crate::runner::ProcessRunner;
use chrono::Utc;
use dh_protocol::command_models::{CommandList, CommandStatus};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

/// Default buffer of each snapshot subscription.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 10;

/// Identifier of a snapshot subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A live feed of registry snapshots.
///
/// The first snapshot is the registry state at subscription time; later
/// ones follow every registration and status change. Snapshots that arrive
/// while the buffer is full are dropped for this subscriber only.
#[derive(Debug)]
pub struct RegistrySubscription {
    id: SubscriptionId,
    receiver: mpsc::Receiver<CommandList>,
}

impl RegistrySubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next snapshot, or `None` once unsubscribed.
    pub async fn recv(&mut self) -> Option<CommandList> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<CommandList> {
        self.receiver.try_recv().ok()
    }
}

struct Commands {
    last_id: u64,
    entries: BTreeMap<CommandId, CommandEntry>,
}

/// Owns all tracked commands and broadcasts their state.
///
/// Pass it around as `Arc<CommandRegistry>`; there is no global instance.
pub struct CommandRegistry {
    commands: Mutex<Commands>,
    /// Lock order: `subscribers` before `commands`.
    subscribers: Mutex<Subscribers>,
    subscriber_capacity: usize,
}

struct Subscribers {
    last_id: u64,
    senders: HashMap<SubscriptionId, mpsc::Sender<CommandList>>,
}

impl CommandRegistry {
    /// Create an empty registry with the default subscriber buffer.
    pub fn new() -> Self {
        Self::with_subscriber_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    /// Create an empty registry whose subscriptions buffer `capacity`
    /// snapshots each.
    pub fn with_subscriber_capacity(capacity: usize) -> Self {
        Self {
            commands: Mutex::new(Commands {
                last_id: 0,
                entries: BTreeMap::new(),
            }),
            subscribers: Mutex::new(Subscribers {
                last_id: 0,
                senders: HashMap::new(),
            }),
            subscriber_capacity: capacity.max(1),
        }
    }

    /// Track a runner under a fresh identifier with status running.
    ///
    /// Identifiers are strictly increasing in the order calls acquire the
    /// registry lock. Broadcasts the new state to all subscribers.
    ///
    /// # Arguments
    ///
    /// * `runner` - The process backing the command
    /// * `label` - Human-readable description, such as the downloaded URL
    pub fn register(&self, runner: Arc<ProcessRunner>, label: impl Into<String>) -> CommandId {
        let label = label.into();
        let id = {
            let mut commands = self.commands.lock();
            commands.last_id += 1;
            let id = CommandId(commands.last_id);
            commands.entries.insert(
                id,
                CommandEntry {
                    id,
                    label: label.clone(),
                    status: CommandStatus::Running,
                    started_at: Utc::now(),
                    exit_code: None,
                    runner,
                },
            );
            id
        };

        info!(command_id = %id, label = %label, "command registered");
        self.broadcast();
        id
    }

    /// Record the outcome of a finished command.
    ///
    /// Exit code 0 moves the entry to completed, anything else to failed.
    /// Entries that already reached a terminal status are left untouched.
    ///
    /// # Returns
    ///
    /// The status of the entry after the call.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown identifier.
    pub fn mark_finished(&self, id: CommandId, exit_code: i32) -> RegistryResult<CommandStatus> {
        let status = {
            let mut commands = self.commands.lock();
            let entry = commands
                .entries
                .get_mut(&id)
                .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

            if entry.status.is_terminal() {
                warn!(
                    command_id = %id,
                    status = %entry.status,
                    exit_code,
                    "command already finished; ignoring"
                );
                return Ok(entry.status);
            }

            entry.status = CommandStatus::from_exit_code(exit_code);
            entry.exit_code = Some(exit_code);
            entry.status
        };

        info!(command_id = %id, exit_code, status = %status, "command finished");
        self.broadcast();
        Ok(status)
    }

    /// Point-in-time copy of all entries, ordered by identifier.
    pub fn list(&self) -> Vec<CommandEntry> {
        self.commands.lock().entries.values().cloned().collect()
    }

    /// Get a single entry with its runner.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown identifier.
    pub fn lookup(&self, id: CommandId) -> RegistryResult<CommandEntry> {
        self.commands
            .lock()
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Wire snapshot of all entries, ordered by identifier.
    pub fn snapshot(&self) -> CommandList {
        let commands = self.commands.lock();
        CommandList {
            commands: commands.entries.values().map(CommandEntry::to_info).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().entries.is_empty()
    }

    /// Open a snapshot feed seeded with the current state.
    pub fn subscribe(&self) -> RegistrySubscription {
        let mut subscribers = self.subscribers.lock();
        subscribers.last_id += 1;
        let id = SubscriptionId(subscribers.last_id);

        let (tx, receiver) = mpsc::channel(self.subscriber_capacity);
        // Fresh channel with capacity >= 1, so the seed always fits.
        let _ = tx.try_send(self.snapshot());
        subscribers.senders.insert(id, tx);

        debug!(subscription = id.0, "registry subscriber added");
        RegistrySubscription { id, receiver }
    }

    /// Stop delivering snapshots to a subscription.
    ///
    /// Returns `false` if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.lock().senders.remove(&id).is_some();
        if removed {
            debug!(subscription = id.0, "registry subscriber removed");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().senders.len()
    }

    /// Offer the current snapshot to every subscriber without blocking.
    fn broadcast(&self) {
        let mut subscribers = self.subscribers.lock();
        if subscribers.senders.is_empty() {
            return;
        }

        // Taken under the subscriber lock so snapshots reach each
        // subscriber in the order they were taken.
        let snapshot = self.snapshot();
        subscribers
            .senders
            .retain(|id, tx| match tx.try_send(snapshot.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    debug!(subscription = id.0, "registry subscriber lagging; snapshot dropped");
                    true
                }
                Err(TrySendError::Closed(_)) => false,
            });
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
