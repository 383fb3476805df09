use std::sync::Arc;

use annotator_session::SessionRegistry;

/// Shared application state handed to every tool invocation and every HTTP
/// handler. The registry is the hub's only piece of shared mutable state
/// (`§5`).
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new() -> Self {
        Self { registry: Arc::new(SessionRegistry::new()) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
