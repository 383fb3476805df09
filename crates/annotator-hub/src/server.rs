//! The Hub Server (`§4.4`): accepts both plain HTTP requests and WebSocket
//! upgrades on one listener, classifying each upgraded connection as a
//! browser session or a bridge attachment.

use std::convert::Infallible;
use std::sync::Arc;

use annotator_protocol::catalog::bridge_event_for_tool;
use annotator_session::SessionRegistry;
use annotator_transport::{ClientType, Frame, Transport};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, info, warn};

use crate::config::HubConfig;
use crate::cors::apply_cors_headers;
use crate::mcp::{self, McpSessionStore, SESSION_HEADER};
use crate::state::AppState;
use crate::tools::{all_tools, AnnotatorTool};

const MCP_PATH: &str = "/mcp";
const MCP_INFO_PATH: &str = "/mcp/info";
const SOCKET_PATH: &str = "/socket";

type BoxBody = http_body_util::combinators::UnsyncBoxBody<Bytes, hyper::Error>;

#[derive(Clone)]
struct HubHandler {
    state: AppState,
    mcp_store: Arc<McpSessionStore>,
    tools: Arc<Vec<Arc<dyn AnnotatorTool>>>,
}

/// Bind and serve until the process is killed. Mirrors the accept-loop shape
/// used throughout this lineage: one `TcpListener`, one `tokio::spawn` per
/// connection, `http1::Builder::new().serve_connection`.
pub async fn run(config: &HubConfig) -> anyhow::Result<()> {
    let handler = HubHandler {
        state: AppState::new(),
        mcp_store: Arc::new(McpSessionStore::new()),
        tools: Arc::new(all_tools()),
    };

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(address = %config.bind_address(), public_address = %config.public_address, "annotator hub listening");

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        debug!(%peer_addr, "accepted connection");
        let handler = handler.clone();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| handle(req, handler.clone()));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).with_upgrades().await {
                let message = err.to_string();
                if message.contains("connection closed before message completed") {
                    debug!(%message, "client disconnected");
                } else {
                    error!(%message, "error serving connection");
                }
            }
        });
    }
}

async fn handle(req: Request<Incoming>, handler: HubHandler) -> Result<Response<BoxBody>, Infallible> {
    let path = req.uri().path().to_string();
    let mut response = match path.as_str() {
        "/health" => health(&handler.state),
        "/api/sessions" => sessions(&handler.state),
        "/toolbar-script" => toolbar_script(),
        MCP_INFO_PATH => mcp_info(),
        MCP_PATH => mcp_request(req, &handler).await,
        SOCKET_PATH => socket_upgrade(req, &handler).await,
        _ => not_found(),
    };

    if let Ok(response) = &mut response {
        apply_cors_headers(response.headers_mut());
    }
    Ok(response.unwrap_or_else(|()| not_found().unwrap()))
}

fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Result<Response<BoxBody>, ()> {
    Ok(Response::builder()
        .status(status)
        .body(Full::new(body.into()).map_err(|never| match never {}).boxed_unsync())
        .unwrap())
}

fn json_response(status: StatusCode, value: serde_json::Value) -> Result<Response<BoxBody>, ()> {
    let body = serde_json::to_vec(&value).unwrap_or_default();
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)).map_err(|never| match never {}).boxed_unsync())
        .unwrap())
}

fn not_found() -> Result<Response<BoxBody>, ()> {
    text_response(StatusCode::NOT_FOUND, "Not Found")
}

fn health(state: &AppState) -> Result<Response<BoxBody>, ()> {
    json_response(
        StatusCode::OK,
        serde_json::json!({ "status": "ok", "sessions": state.registry.len() }),
    )
}

fn sessions(state: &AppState) -> Result<Response<BoxBody>, ()> {
    json_response(StatusCode::OK, serde_json::json!(state.registry.list()))
}

fn mcp_info() -> Result<Response<BoxBody>, ()> {
    json_response(
        StatusCode::OK,
        serde_json::json!({
            "name": "annotator-hub",
            "version": env!("CARGO_PKG_VERSION"),
            "protocolVersion": "2025-06-18",
            "tools": annotator_protocol::catalog::all_tool_descriptors(),
        }),
    )
}

fn toolbar_script() -> Result<Response<BoxBody>, ()> {
    const SCRIPT: &str = include_str!("toolbar_script.js");
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/javascript")
        .body(Full::new(Bytes::from_static(SCRIPT.as_bytes())).map_err(|never| match never {}).boxed_unsync())
        .unwrap())
}

async fn mcp_request(req: Request<Incoming>, handler: &HubHandler) -> Result<Response<BoxBody>, ()> {
    let session_id = req.headers().get(SESSION_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string);
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return text_response(StatusCode::BAD_REQUEST, "could not read request body"),
    };

    let exchange = mcp::handle_request(&handler.mcp_store, &handler.tools, &handler.state, session_id.as_deref(), &body).await;

    let body = serde_json::to_vec(&exchange.response).unwrap_or_default();
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header(SESSION_HEADER, exchange.session_id)
        .body(Full::new(Bytes::from(body)).map_err(|never| match never {}).boxed_unsync())
        .unwrap())
}

fn query_param(uri: &hyper::Uri, key: &str) -> Option<String> {
    uri.query()?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

/// Upgrade `/socket?clientType=browser|bridge` to a WebSocket connection and
/// wire it into the session registry (browser) or the MCP dispatch bridge
/// (bridge), per `§4.4`.
async fn socket_upgrade(mut req: Request<Incoming>, handler: &HubHandler) -> Result<Response<BoxBody>, ()> {
    let Some(client_type) = query_param(req.uri(), "clientType").and_then(|raw| ClientType::parse(&raw)) else {
        return text_response(StatusCode::BAD_REQUEST, "clientType must be `browser` or `bridge`");
    };

    let Some(key) = req.headers().get("Sec-WebSocket-Key").cloned() else {
        return text_response(StatusCode::BAD_REQUEST, "missing Sec-WebSocket-Key");
    };
    let accept_key = derive_accept_key(key.as_bytes());

    let handler = handler.clone();
    tokio::spawn(async move {
        match hyper::upgrade::on(&mut req).await {
            Ok(upgraded) => {
                let io = TokioIo::new(upgraded);
                let stream = WebSocketStream::from_raw_socket(io, Role::Server, None).await;
                accept_connection(stream, client_type, handler).await;
            }
            Err(err) => warn!(%err, "websocket upgrade failed"),
        }
    });

    Ok(Response::builder()
        .status(StatusCode::SWITCHING_PROTOCOLS)
        .header("Connection", "Upgrade")
        .header("Upgrade", "websocket")
        .header("Sec-WebSocket-Accept", accept_key)
        .body(Full::new(Bytes::new()).map_err(|never| match never {}).boxed_unsync())
        .unwrap())
}

async fn accept_connection<S>(stream: WebSocketStream<S>, client_type: ClientType, handler: HubHandler)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    use annotator_rpc::RpcPeer;
    use annotator_transport::WebSocketTransport;

    let (transport, frames) = WebSocketTransport::spawn(stream, client_type);

    match client_type {
        ClientType::Browser => {
            let peer = RpcPeer::spawn(transport.clone(), frames);
            let registry = handler.state.registry.clone();
            let session_id = registry.register(transport.clone(), peer.clone());
            info!(%session_id, "browser session connected");

            peer.handle("ping", |_args| async move { Ok(serde_json::json!({})) });

            let list_registry = registry.clone();
            peer.handle("list-sessions", move |_args| {
                let registry = list_registry.clone();
                async move { Ok(serde_json::json!(registry.list())) }
            });

            let update_registry = registry.clone();
            peer.handle("page-context-changed", move |args| {
                let registry = update_registry.clone();
                async move {
                    let url = args.get("url").and_then(serde_json::Value::as_str).unwrap_or_default().to_string();
                    let title = args.get("title").and_then(serde_json::Value::as_str).unwrap_or_default().to_string();
                    registry.update_metadata(session_id, url, title);
                    Ok(serde_json::Value::Null)
                }
            });

            // Ordering guarantee (§5): this is sent before any page-context
            // update can observe the session, since both travel over the
            // same ordered transport.
            let _ = transport.send_frame(Frame::event("connected", serde_json::json!({ "sessionId": session_id.to_string() }), None)).await;

            watch_disconnect(transport, registry, peer, session_id).await;
        }
        ClientType::Bridge => {
            let peer = RpcPeer::spawn(transport.clone(), frames);
            for tool in handler.tools.iter().cloned() {
                let Some(event) = bridge_event_for_tool(tool.name()) else { continue };
                let state = handler.state.clone();
                peer.handle(event, move |args| {
                    let state = state.clone();
                    let tool = tool.clone();
                    async move {
                        let session_id = args.get("sessionId").cloned().unwrap_or(serde_json::Value::Null);
                        let mut call_args = args.get("args").cloned().unwrap_or_else(|| serde_json::json!({}));
                        if let serde_json::Value::Object(ref mut map) = call_args {
                            map.insert("sessionId".to_string(), session_id);
                        }
                        let result = tool.call(&state, call_args).await;
                        Ok(serde_json::json!({ "success": true, "data": result }))
                    }
                });
            }
            info!("bridge attached");
        }
    }
}

/// Poll the transport for disconnection and retire its session. Simple
/// polling, not a notification channel: disconnection is rare compared to
/// the tool-call traffic this loop would otherwise have to interleave with.
async fn watch_disconnect(
    transport: Arc<dyn Transport>,
    registry: Arc<SessionRegistry>,
    peer: Arc<annotator_rpc::RpcPeer>,
    session_id: annotator_protocol::SessionId,
) {
    while transport.is_connected() {
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }
    peer.dispose();
    registry.remove(session_id);
    info!(%session_id, "browser session disconnected");
}
