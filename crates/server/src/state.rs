//! Application state shared across routes.

use dh_core::files::FileStore;
use dh_core::jobs::Dispatcher;
use dh_core::registry::CommandRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        self.dispatcher.registry()
    }

    pub fn files(&self) -> &FileStore {
        self.dispatcher.files()
    }
}
