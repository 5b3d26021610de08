//! Inbound HTTP: the file port and the async MDN port.
//!
//! Every path and method reaches the handler; the services answer non-POST
//! requests with 400 themselves. Shutdown stops accepting connections and
//! lets requests in flight finish.

use std::net::SocketAddr;
use std::sync::Arc;

use as2_03_mdn::AsyncMdnReceiver;
use as2_05_file_receive::FileReceiverService;
use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use shared_types::{ConnectionInfo, Headers, HttpReply};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Clone)]
struct FileState {
    service: Arc<FileReceiverService>,
    local: SocketAddr,
}

#[derive(Clone)]
struct MdnState {
    receiver: Arc<AsyncMdnReceiver>,
    local: SocketAddr,
}

/// Router for the file port. `local` is the address the listener is bound to.
pub fn file_router(service: Arc<FileReceiverService>, local: SocketAddr) -> Router {
    Router::new()
        .fallback(receive_file)
        .with_state(FileState { service, local })
}

/// Router for the async MDN port.
pub fn mdn_router(receiver: Arc<AsyncMdnReceiver>, local: SocketAddr) -> Router {
    Router::new()
        .fallback(receive_mdn)
        .with_state(MdnState { receiver, local })
}

/// Serves `router` until `shutdown` flips.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown.changed().await;
    })
    .await
}

async fn receive_file(
    State(state): State<FileState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let connection = connection_info(peer, state.local, &method, &uri);
    debug!(peer = %peer, bytes = body.len(), "[http] File port request");
    let reply = state
        .service
        .handle(connection, to_headers(&headers), body.to_vec())
        .await;
    to_response(reply)
}

async fn receive_mdn(
    State(state): State<MdnState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let connection = connection_info(peer, state.local, &method, &uri);
    debug!(peer = %peer, bytes = body.len(), "[http] MDN port request");
    let reply = state
        .receiver
        .handle(connection, to_headers(&headers), body.to_vec());
    to_response(reply)
}

fn connection_info(peer: SocketAddr, local: SocketAddr, method: &Method, uri: &Uri) -> ConnectionInfo {
    ConnectionInfo {
        source_ip: peer.ip().to_string(),
        source_port: peer.port(),
        destination_ip: local.ip().to_string(),
        destination_port: local.port(),
        request_method: method.as_str().to_string(),
        request_uri: uri.to_string(),
    }
}

fn to_headers(map: &HeaderMap) -> Headers {
    map.iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn to_response(reply: HttpReply) -> Response {
    let mut response = Response::new(Body::from(reply.body));
    *response.status_mut() =
        StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    for (name, value) in reply.headers.iter() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().append(name, value);
            }
            _ => warn!(header = %name, "[http] Dropping header that cannot be sent"),
        }
    }
    response
}
