//! Command listing and log endpoints, including their SSE variants.

use crate::error::ApiError;
use crate::state::AppState;
use async_stream::stream;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use dh_core::registry::{CommandId, CommandRegistry, RegistrySubscription};
use dh_protocol::api::{CommandLogs, LogLine, LOG_STREAM_DONE_EVENT};
use dh_protocol::command_models::CommandList;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::{debug, warn};

/// `GET /api/commands`
pub async fn list_commands(State(state): State<AppState>) -> Json<CommandList> {
    Json(state.registry().snapshot())
}

/// `GET /api/commands/stream`
///
/// The first event carries the current state; every registry change sends a
/// full snapshot. A client that falls behind misses intermediate snapshots.
pub async fn stream_commands(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut feed = SubscriptionGuard::new(Arc::clone(state.registry()));

    let events = stream! {
        while let Some(list) = feed.subscription.recv().await {
            match Event::default().json_data(&list) {
                Ok(event) => yield Ok(event),
                Err(e) => warn!(error = %e, "failed to encode command snapshot"),
            }
        }
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// `GET /api/commands/{id}/logs`
pub async fn command_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommandLogs>, ApiError> {
    let id: CommandId = id.parse()?;
    let entry = state.registry().lookup(id)?;

    Ok(Json(CommandLogs {
        id: id.to_string(),
        logs: entry.runner.snapshot_logs(),
    }))
}

/// `GET /api/commands/{id}/logs/stream`
///
/// Replays the captured output, follows live lines and ends with a `done`
/// event once the process has finished.
pub async fn stream_command_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let id: CommandId = id.parse()?;
    let entry = state.registry().lookup(id)?;
    let mut output = entry.runner.subscribe_output();

    let events = stream! {
        while let Some(line) = output.recv().await {
            match Event::default().json_data(LogLine { line }) {
                Ok(event) => yield Ok(event),
                Err(e) => warn!(command_id = %id, error = %e, "failed to encode log line"),
            }
        }
        debug!(command_id = %id, "log stream complete");
        yield Ok(Event::default().event(LOG_STREAM_DONE_EVENT).data("{}"));
    };

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Unsubscribes from the registry when the SSE connection goes away.
struct SubscriptionGuard {
    registry: Arc<CommandRegistry>,
    subscription: RegistrySubscription,
}

impl SubscriptionGuard {
    fn new(registry: Arc<CommandRegistry>) -> Self {
        let subscription = registry.subscribe();
        Self {
            registry,
            subscription,
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.subscription.id());
    }
}
