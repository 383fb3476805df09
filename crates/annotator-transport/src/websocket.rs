//! WebSocket realisation of the Transport Adapter, the first real consumer
//! of the `tokio-tungstenite` dependency in this lineage.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::frame::Frame;
use crate::transport::{ClientType, ConnectedFlag, ConnectionId, FrameReceiver, Transport, TransportError, TransportResult};

/// A transport backed by one `tokio-tungstenite` WebSocket stream, generic
/// over the underlying I/O (plain `TcpStream` on the server side via hyper's
/// upgrade mechanism, or any `AsyncRead + AsyncWrite` for an outbound
/// connection such as the bridge dialling the hub).
pub struct WebSocketTransport {
    connection_id: ConnectionId,
    client_type: ClientType,
    connected: Arc<ConnectedFlag>,
    outbound: mpsc::UnboundedSender<Message>,
}

impl WebSocketTransport {
    /// Wrap an already-established WebSocket stream, spawning the
    /// background read/write tasks, and return the transport handle plus
    /// the channel of frames read off the wire. The caller (hub server or
    /// bridge) owns classifying and routing those frames; the transport
    /// itself is opaque to event semantics.
    pub fn spawn<S>(stream: WebSocketStream<S>, client_type: ClientType) -> (Arc<Self>, FrameReceiver)
    where
        S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        let connection_id = ConnectionId::new();
        let connected = Arc::new(ConnectedFlag::new_connected());
        let (mut sink, mut source) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<Frame>();

        let writer_connected = connected.clone();
        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                if sink.send(message).await.is_err() {
                    break;
                }
            }
            writer_connected.clear();
            let _ = sink.close().await;
        });

        let reader_connected = connected.clone();
        tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => match Frame::from_text(&text) {
                        Ok(frame) => {
                            if inbound_tx.send(frame).is_err() {
                                break;
                            }
                        }
                        Err(error) => {
                            tracing::warn!(%error, "discarding malformed transport frame");
                        }
                    },
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
            reader_connected.clear();
        });

        let transport =
            Arc::new(Self { connection_id, client_type, connected, outbound: outbound_tx });
        (transport, inbound_rx)
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    fn client_type(&self) -> ClientType {
        self.client_type
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    async fn send_frame(&self, frame: Frame) -> TransportResult<()> {
        if !self.is_connected() {
            return Err(TransportError::Closed);
        }
        let text = frame.to_text()?;
        self.outbound
            .send(Message::Text(text.into()))
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&self) {
        self.connected.clear();
        // Dropping the sender side tells the writer task to drain and exit.
    }
}
