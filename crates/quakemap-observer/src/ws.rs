//! `WebSocket` handler for layer population events.
//!
//! Pages connect to `GET /ws/layers` and load overlays in response to the
//! JSON-encoded [`LayerEvent`]s they receive. A connection first receives
//! one event per overlay that is already populated, then one event for
//! each later population. The subscription is taken before the upgrade
//! completes, so no population can fall between the page's snapshot and
//! its live feed.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use quakemap_types::LayerEvent;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming layer events.
///
/// # Route
///
/// `GET /ws/layers`
pub async fn ws_layers(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let (snapshot, rx) = state.layer_feed().await;
    ws.on_upgrade(move |socket| stream_layer_events(socket, snapshot, rx))
}

/// Replay the snapshot, then forward broadcast events until either side
/// goes away.
async fn stream_layer_events(
    mut socket: WebSocket,
    snapshot: Vec<LayerEvent>,
    mut rx: Receiver<LayerEvent>,
) {
    debug!(populated = snapshot.len(), "layer page connected");

    for event in &snapshot {
        if !send_event(&mut socket, event).await {
            return;
        }
    }

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Ok(event) => {
                    if !send_event(&mut socket, &event).await {
                        return;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "layer page lagged behind the broadcast");
                }
                Err(RecvError::Closed) => {
                    debug!("layer broadcast closed");
                    return;
                }
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Ping(data))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("layer page disconnected");
                    return;
                }
                Some(Err(e)) => {
                    debug!(error = %e, "layer socket error");
                    return;
                }
                Some(Ok(_)) => {}
            },
        }
    }
}

/// Send one event as a text frame. Returns `false` once the page is gone.
async fn send_event(socket: &mut WebSocket, event: &LayerEvent) -> bool {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            // Skip the event; the connection is still usable.
            warn!(error = %e, "failed to encode layer event");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!(layer = ?event.layer, "layer page disconnected mid-send");
        return false;
    }
    true
}
