use std::collections::HashSet;

use parking_lot::Mutex;
use uuid::Uuid;

/// Tracks which `Mcp-Session-Id` values have completed `initialize`, per the
/// session-keyed HTTP MCP transport (resolved Open Question (i)): each caller
/// gets its own MCP session state, never shared across unrelated callers, but
/// that state is just "has this id initialized yet" — nothing here overlaps
/// with the browser/bridge `SessionRegistry`.
#[derive(Default)]
pub struct McpSessionStore {
    initialized: Mutex<HashSet<String>>,
}

impl McpSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    pub fn mark_initialized(&self, id: &str) {
        self.initialized.lock().insert(id.to_string());
    }

    pub fn is_initialized(&self, id: &str) -> bool {
        self.initialized.lock().contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_id_is_not_initialized() {
        let store = McpSessionStore::new();
        assert!(!store.is_initialized("unknown"));
    }

    #[test]
    fn marking_initialized_is_observable() {
        let store = McpSessionStore::new();
        let id = store.issue_id();
        assert!(!store.is_initialized(&id));
        store.mark_initialized(&id);
        assert!(store.is_initialized(&id));
    }

    #[test]
    fn two_issued_ids_are_distinct() {
        let store = McpSessionStore::new();
        assert_ne!(store.issue_id(), store.issue_id());
    }
}
