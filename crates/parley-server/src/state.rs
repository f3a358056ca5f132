//! Shared application state for the relay server.
//!
//! [`AppState`] wires the relay core together: one [`SessionRegistry`]
//! constructed at process start, and the [`Dispatcher`] operating on
//! it. The state is wrapped in [`Arc`](std::sync::Arc) and injected
//! into handlers via Axum's `State` extractor; no ambient globals.

use std::sync::Arc;

use parley_relay::{Dispatcher, SessionRegistry};

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: Arc<SessionRegistry>,
    dispatcher: Dispatcher,
}

impl AppState {
    /// Create the state with an empty registry.
    pub fn new() -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        Self { registry, dispatcher }
    }

    /// The event dispatcher.
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The connection registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
