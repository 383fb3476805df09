//! The RPC Engine (`§4.2`): turns a raw `Transport` into a typed,
//! deadline-bounded request/response API usable from either side of the
//! connection. Every connected peer — browser, bridge, or the bridge's own
//! outbound connection to the hub — gets exactly one `RpcPeer`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use annotator_protocol::{Envelope, HubError};
use annotator_transport::{Frame, FrameReceiver, Transport};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::sync::oneshot;

/// A procedure handler installed with `RpcPeer::handle`. Boxed so peers can
/// hold a heterogeneous table of them.
pub type Handler =
    Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<Value, HubError>> + Send>> + Send + Sync>;

struct PendingCall {
    #[allow(dead_code)]
    procedure: String,
    #[allow(dead_code)]
    deadline: Instant,
    resolver: oneshot::Sender<Result<Value, HubError>>,
}

/// The engine-level wrapper around one transport that can both serve
/// procedures and invoke them (Design Notes, `§9`: "do not fork the
/// abstraction into client and server types").
pub struct RpcPeer {
    transport: Arc<dyn Transport>,
    handlers: RwLock<HashMap<String, Handler>>,
    pending: Mutex<HashMap<u64, PendingCall>>,
    next_correlation_id: AtomicU64,
    disposed: AtomicBool,
}

impl RpcPeer {
    /// Wrap a transport and begin draining its inbound frame stream. The
    /// returned peer is immediately usable for `handle`/`call`; the reader
    /// task disposes it automatically once the frame stream ends (the
    /// transport disconnected).
    pub fn spawn(transport: Arc<dyn Transport>, frames: FrameReceiver) -> Arc<Self> {
        let peer = Arc::new(Self {
            transport,
            handlers: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            next_correlation_id: AtomicU64::new(1),
            disposed: AtomicBool::new(false),
        });
        tokio::spawn(Self::drain(peer.clone(), frames));
        peer
    }

    async fn drain(peer: Arc<Self>, mut frames: FrameReceiver) {
        while let Some(frame) = frames.recv().await {
            match frame {
                Frame::Event { event, args, ack_id } => {
                    let peer = peer.clone();
                    tokio::spawn(async move { peer.dispatch_inbound(event, args, ack_id).await });
                }
                Frame::Ack { ack_id, value } => peer.resolve_pending(ack_id, value),
            }
        }
        peer.dispose();
    }

    async fn dispatch_inbound(&self, event: String, args: Value, ack_id: Option<u64>) {
        let handler = self.handlers.read().get(&event).cloned();
        let result = match handler {
            Some(handler) => handler(args).await,
            None => Err(HubError::ProcedureError { message: format!("no handler installed for `{event}`") }),
        };
        if let Some(ack_id) = ack_id {
            let envelope = match &result {
                Ok(value) => Envelope::ok(value.clone()),
                Err(error) => Envelope::err(error),
            };
            if let Ok(value) = serde_json::to_value(envelope) {
                let _ = self.transport.send_frame(Frame::ack(ack_id, value)).await;
            }
        }
    }

    fn resolve_pending(&self, ack_id: u64, value: Value) {
        let entry = self.pending.lock().remove(&ack_id);
        let Some(entry) = entry else { return };
        let outcome = match serde_json::from_value::<Envelope>(value) {
            Ok(envelope) => envelope
                .into_result()
                .map_err(|payload| HubError::ProcedureError { message: payload.message }),
            Err(error) => Err(HubError::IoError { message: error.to_string() }),
        };
        let _ = entry.resolver.send(outcome);
    }

    /// Install a procedure this peer serves. `fn(args) -> Result<value,
    /// error>`; its outcome is packaged into an envelope and returned
    /// through the matching ack.
    pub fn handle<F, Fut>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, HubError>> + Send + 'static,
    {
        self.handlers.write().insert(name.into(), Arc::new(move |args| Box::pin(handler(args))));
    }

    /// Invoke a procedure on the remote side of this peer with the given
    /// deadline, resolving with whichever of {ack delivery, timer fire,
    /// transport close} happens first (`§4.2`).
    pub async fn call(&self, procedure: &str, args: Value, deadline: Duration) -> Result<Value, HubError> {
        if self.disposed.load(Ordering::Acquire) || !self.transport.is_connected() {
            return Err(HubError::TransportClosed);
        }

        let correlation_id = self.next_correlation_id.fetch_add(1, Ordering::Relaxed);
        let (resolver, receiver) = oneshot::channel();
        self.pending.lock().insert(
            correlation_id,
            PendingCall { procedure: procedure.to_string(), deadline: Instant::now() + deadline, resolver },
        );

        if self.transport.send_frame(Frame::event(procedure, args, Some(correlation_id))).await.is_err() {
            self.pending.lock().remove(&correlation_id);
            return Err(HubError::TransportClosed);
        }

        match tokio::time::timeout(deadline, receiver).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(HubError::TransportClosed),
            Err(_) => {
                self.pending.lock().remove(&correlation_id);
                Err(HubError::Timeout { deadline_ms: deadline.as_millis() as u64 })
            }
        }
    }

    /// Reject every pending call with `transport-closed` and clear the
    /// tables. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let pending: Vec<PendingCall> = self.pending.lock().drain().map(|(_, entry)| entry).collect();
        for entry in pending {
            let _ = entry.resolver.send(Err(HubError::TransportClosed));
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotator_transport::{ClientType, ConnectionId, TransportResult};
    use std::sync::Mutex as StdMutex;
    use tokio::sync::mpsc;

    /// A transport test double: every `send_frame` is captured in a buffer,
    /// `is_connected` flips when `close` is called. No actual I/O.
    struct LoopbackTransport {
        sent: StdMutex<Vec<Frame>>,
        connected: AtomicBool,
    }

    #[async_trait::async_trait]
    impl Transport for LoopbackTransport {
        fn connection_id(&self) -> ConnectionId {
            ConnectionId::new()
        }
        fn client_type(&self) -> ClientType {
            ClientType::Browser
        }
        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::Acquire)
        }
        async fn send_frame(&self, frame: Frame) -> TransportResult<()> {
            self.sent.lock().unwrap().push(frame);
            Ok(())
        }
        async fn close(&self) {
            self.connected.store(false, Ordering::Release);
        }
    }

    fn loopback() -> (Arc<LoopbackTransport>, FrameReceiver, mpsc::UnboundedSender<Frame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport =
            Arc::new(LoopbackTransport { sent: StdMutex::new(Vec::new()), connected: AtomicBool::new(true) });
        (transport, rx, tx)
    }

    #[tokio::test]
    async fn call_times_out_with_no_ack() {
        let (transport, rx, _tx) = loopback();
        let peer = RpcPeer::spawn(transport, rx);
        let result = peer.call("get-page-context", Value::Null, Duration::from_millis(20)).await;
        assert!(matches!(result, Err(HubError::Timeout { .. })));
    }

    #[tokio::test]
    async fn dispose_fails_pending_calls_with_transport_closed() {
        let (transport, rx, _tx) = loopback();
        let peer = RpcPeer::spawn(transport, rx);
        let call = peer.call("inject-js", Value::Null, Duration::from_secs(5));
        // Give the call a moment to register before disposing out from under it.
        tokio::time::sleep(Duration::from_millis(5)).await;
        peer.dispose();
        let result = call.await;
        assert!(matches!(result, Err(HubError::TransportClosed)));
    }

    #[tokio::test]
    async fn inbound_event_without_handler_acks_procedure_error() {
        let (transport, rx, tx) = loopback();
        let peer = RpcPeer::spawn(transport.clone(), rx);
        tx.send(Frame::event("unregistered", Value::Null, Some(99))).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(matches!(&sent[0], Frame::Ack { ack_id: 99, .. }));
        let _ = peer;
    }

    #[tokio::test]
    async fn handler_result_is_delivered_through_ack() {
        let (transport, rx, tx) = loopback();
        let peer = RpcPeer::spawn(transport.clone(), rx);
        peer.handle("ping", |_args| async move { Ok(serde_json::json!("pong")) });
        tx.send(Frame::event("ping", Value::Null, Some(1))).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let sent = transport.sent.lock().unwrap();
        match &sent[0] {
            Frame::Ack { value, .. } => {
                let envelope: Envelope = serde_json::from_value(value.clone()).unwrap();
                assert_eq!(envelope.into_result().unwrap(), serde_json::json!("pong"));
            }
            Frame::Event { .. } => panic!("expected ack"),
        }
    }
}
