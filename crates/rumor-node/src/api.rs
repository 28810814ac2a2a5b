//! HTTP surface of a single peer.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use rumor_gossip::{decode_value, Outcome, Peer};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Gossip delivery endpoint.
pub const GOSSIP_PATH: &str = "/gossip";

/// Peer status endpoint.
pub const STATUS_PATH: &str = "/status";

/// A peer shared with its request handlers. Only this peer's own handlers
/// ever lock it.
pub type SharedPeer = Arc<Mutex<Peer>>;

/// Build the router for one peer.
pub fn build_router(peer: SharedPeer) -> Router {
    Router::new()
        .route(GOSSIP_PATH, put(gossip))
        .route(STATUS_PATH, get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(peer)
}

async fn gossip(State(peer): State<SharedPeer>, body: Bytes) -> Response {
    let value = match decode_value(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("rejected gossip: {}", e);
            return (StatusCode::BAD_REQUEST, "body must be an integer\n").into_response();
        }
    };

    let mut peer = peer.lock().await;
    match peer.receive(value) {
        Outcome::Accepted => StatusCode::OK.into_response(),
        Outcome::Duplicate => (StatusCode::OK, peer.duplicate_notice(value)).into_response(),
    }
}

/// Peer status response.
#[derive(Debug, Serialize)]
struct PeerStatus {
    peer: usize,
    port: u16,
    seen: usize,
    active_relays: usize,
}

async fn status(State(peer): State<SharedPeer>) -> Json<PeerStatus> {
    let peer = peer.lock().await;
    Json(PeerStatus {
        peer: peer.id().0,
        port: peer.port(),
        seen: peer.seen_count(),
        active_relays: peer.active_relays(),
    })
}
