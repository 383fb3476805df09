//! Serves one line-delimited JSON-RPC request per stdin line from the
//! bridge's own MCP front (`crate::mcp`) and writes the response back to
//! stdout. Stdout carries only MCP traffic; everything else goes to stderr
//! via `tracing`.
//!
//! Reads stdin continuously and independently of the hub connection's
//! state: a tool call arriving mid-outage must be answered (and must fire
//! the immediate-reconnect trigger) right away rather than queuing behind
//! whatever backoff sleep the reconnect loop is currently in (`§4.6`). The
//! loop always dispatches against whatever peer `peer_rx` currently holds;
//! `RpcPeer::call` itself reports a disconnected peer without this loop
//! needing to know the connection's state.

use std::sync::Arc;
use std::time::Duration;

use annotator_rpc::RpcPeer;
use annotator_transport::{ClientType, Transport, WebSocketTransport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{watch, Notify};
use tracing::warn;

pub const DISCONNECT_POLL: Duration = Duration::from_millis(500);

/// Connect to the hub's `/socket?clientType=bridge` endpoint. Callers race
/// this against a timeout for the first connection attempt (`§6`).
pub async fn connect(socket_url: &str) -> anyhow::Result<Arc<RpcPeer>> {
    let (ws_stream, _response) = tokio_tungstenite::connect_async(socket_url).await?;
    let (transport, frames) = WebSocketTransport::spawn(ws_stream, ClientType::Bridge);
    Ok(RpcPeer::spawn(transport, frames))
}

/// Run the stdin -> local MCP dispatch -> stdout loop until stdin closes
/// (clean shutdown, `Ok(())`) or an I/O error occurs. Never returns because
/// the hub connection dropped: dispatch against a disconnected peer still
/// answers the call ("Not connected to server. Reconnecting...") instead of
/// blocking, so this loop has no reason to stop reading.
pub async fn pump(mut peer_rx: watch::Receiver<Arc<RpcPeer>>, retry_now: Arc<Notify>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "discarding malformed stdin line");
                continue;
            }
        };

        let peer = peer_rx.borrow().clone();
        let response = crate::mcp::dispatch(&peer, request, &retry_now).await;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Resolves once the given peer's transport has dropped. Polling, not a
/// notification channel, mirroring the hub's own `watch_disconnect`.
pub async fn disconnect_watch(peer: &RpcPeer) {
    while peer.transport().is_connected() {
        tokio::time::sleep(DISCONNECT_POLL).await;
    }
}
