//! The Session Registry (`§4.3`): the hub's only shared mutable state.
//! Written on connect/disconnect/metadata-update, read on every tool call.

use std::collections::HashMap;
use std::sync::Arc;

use annotator_protocol::{HubError, SessionId};
use annotator_rpc::RpcPeer;
use annotator_transport::Transport;
use parking_lot::RwLock;

use crate::metadata::{SessionMetadata, SessionSummary};

/// Everything the registry keeps per session: the live transport, the RPC
/// peer built on top of it, and the mutable metadata the browser reports.
pub struct SessionEntry {
    pub transport: Arc<dyn Transport>,
    pub peer: Arc<RpcPeer>,
    pub metadata: RwLock<SessionMetadata>,
}

/// Process-wide table `session-id -> {transport, rpc-peer, metadata}`
/// (Design Notes, `§9`: "one registry, initialised by the hub entry point").
/// A single `parking_lot::RwLock` protects the map; readers snapshot the id
/// set before iterating, so a session removed mid-call either appears in a
/// `list()` snapshot or does not, never half-present.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a session id for a freshly connected browser transport and
    /// register its RPC peer under it.
    pub fn register(&self, transport: Arc<dyn Transport>, peer: Arc<RpcPeer>) -> SessionId {
        let id = SessionId::new();
        let entry = Arc::new(SessionEntry { transport, peer, metadata: RwLock::new(SessionMetadata::new()) });
        self.sessions.write().insert(id, entry);
        id
    }

    pub fn update_metadata(&self, id: SessionId, url: String, title: String) {
        if let Some(entry) = self.sessions.read().get(&id) {
            entry.metadata.write().update_page_context(url, title);
        }
    }

    /// Remove a session, called from its transport's disconnect handler.
    /// Returns the removed entry so the caller can dispose its peer.
    pub fn remove(&self, id: SessionId) -> Option<Arc<SessionEntry>> {
        self.sessions.write().remove(&id)
    }

    /// A consistent snapshot of every currently registered session.
    pub fn list(&self) -> Vec<SessionSummary> {
        self.sessions
            .read()
            .iter()
            .map(|(id, entry)| {
                let metadata = entry.metadata.read();
                SessionSummary {
                    session_id: id.to_string(),
                    url: metadata.url.clone(),
                    title: metadata.title.clone(),
                    connected_at_ms: metadata.connected_at_ms,
                    last_activity_ms: metadata.last_activity_ms,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Auto-select semantics (`§4.3`): an explicit id is looked up directly;
    /// with none given, a peer is returned only when exactly one session
    /// exists. This is a pure function of the current snapshot, never
    /// mutable "active session" state (Design Notes, `§9`).
    pub fn resolve(&self, session_id: Option<SessionId>) -> Result<Arc<SessionEntry>, HubError> {
        let sessions = self.sessions.read();
        match session_id {
            Some(id) => sessions
                .get(&id)
                .cloned()
                .ok_or(HubError::SessionNotFound { session_id: id.to_string() }),
            None => match sessions.len() {
                1 => Ok(sessions.values().next().cloned().expect("len checked above")),
                0 => Err(HubError::NoBrowserConnected),
                _ => Err(HubError::SessionAmbiguous { available: sessions.keys().copied().collect() }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotator_rpc::RpcPeer;
    use annotator_transport::{ClientType, ConnectionId, Frame, TransportResult};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::mpsc;

    struct NullTransport {
        connected: AtomicBool,
    }

    #[async_trait::async_trait]
    impl Transport for NullTransport {
        fn connection_id(&self) -> ConnectionId {
            ConnectionId::new()
        }
        fn client_type(&self) -> ClientType {
            ClientType::Browser
        }
        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::Acquire)
        }
        async fn send_frame(&self, _frame: Frame) -> TransportResult<()> {
            Ok(())
        }
        async fn close(&self) {
            self.connected.store(false, Ordering::Release);
        }
    }

    fn fresh_peer() -> Arc<RpcPeer> {
        let (_tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(NullTransport { connected: AtomicBool::new(true) });
        RpcPeer::spawn(transport, rx)
    }

    #[test]
    fn resolve_nil_succeeds_only_with_exactly_one_session() {
        let registry = SessionRegistry::new();
        assert!(matches!(registry.resolve(None), Err(HubError::NoBrowserConnected)));

        let transport = Arc::new(NullTransport { connected: AtomicBool::new(true) });
        let id = registry.register(transport, fresh_peer());
        assert!(registry.resolve(None).is_ok());

        let transport2 = Arc::new(NullTransport { connected: AtomicBool::new(true) });
        registry.register(transport2, fresh_peer());
        match registry.resolve(None) {
            Err(HubError::SessionAmbiguous { available }) => assert_eq!(available.len(), 2),
            Err(other) => panic!("expected ambiguous, got error kind {}", other.kind()),
            Ok(_) => panic!("expected ambiguous, got a resolved peer"),
        }

        registry.remove(id);
        assert!(registry.resolve(None).is_ok());
    }

    #[test]
    fn resolve_unknown_id_is_not_found() {
        let registry = SessionRegistry::new();
        let bogus = SessionId::new();
        assert!(matches!(registry.resolve(Some(bogus)), Err(HubError::SessionNotFound { .. })));
    }

    #[test]
    fn list_reflects_registered_and_removed_sessions() {
        let registry = SessionRegistry::new();
        assert!(registry.list().is_empty());
        let transport = Arc::new(NullTransport { connected: AtomicBool::new(true) });
        let id = registry.register(transport, fresh_peer());
        assert_eq!(registry.list().len(), 1);
        registry.remove(id);
        assert!(registry.list().is_empty());
    }
}
