//! Axum router construction for the map server.
//!
//! Assembles all routes (page, REST, `WebSocket`) into a single [`Router`]
//! with CORS enabled so the JSON endpoints can back other front ends.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the map server.
///
/// The router includes:
/// - `GET /` -- the interactive map page
/// - `GET /api/map` -- map composition (view, layers, control, legend)
/// - `GET /api/earthquakes` -- styled earthquake markers
/// - `GET /api/plates` -- plate boundary features
/// - `GET /api/legend` -- magnitude legend
/// - `GET /api/status` -- per-overlay population status
/// - `GET /ws/layers` -- `WebSocket` layer population events
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/layers", get(ws::ws_layers))
        // REST API
        .route("/api/map", get(handlers::get_map))
        .route("/api/earthquakes", get(handlers::get_earthquakes))
        .route("/api/plates", get(handlers::get_plates))
        .route("/api/legend", get(handlers::get_legend))
        .route("/api/status", get(handlers::get_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
