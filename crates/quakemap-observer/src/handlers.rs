//! REST endpoint handlers for the map server.
//!
//! All handlers read from the shared [`AppState`]. Overlay endpoints
//! answer immediately with whatever the layer holds; a pending layer is
//! reported as such rather than blocking until its feed resolves.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Interactive map page |
//! | `GET` | `/api/map` | Map composition |
//! | `GET` | `/api/earthquakes` | Earthquake markers |
//! | `GET` | `/api/plates` | Plate boundary features |
//! | `GET` | `/api/legend` | Magnitude legend |
//! | `GET` | `/api/status` | Overlay population status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::error::ObserverError;
use crate::page::render_page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- map page
// ---------------------------------------------------------------------------

/// Serve the interactive map page.
pub async fn index(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    Ok(Html(render_page(&state.composition)?))
}

// ---------------------------------------------------------------------------
// GET /api/map -- composition
// ---------------------------------------------------------------------------

/// Return the map composition: view, base layers, overlays, layer
/// control, and legend.
pub async fn get_map(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    Ok(Json(serde_json::to_value(state.composition.as_ref())?))
}

// ---------------------------------------------------------------------------
// GET /api/earthquakes -- markers
// ---------------------------------------------------------------------------

/// Return the earthquake overlay.
///
/// `markers` is empty while the layer is pending. `skipped` counts feed
/// features that had no point geometry.
pub async fn get_earthquakes(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let layer = state.earthquakes.read().await;

    Ok(Json(serde_json::json!({
        "status": layer.status(),
        "count": layer.len(),
        "skipped": layer.skipped(),
        "markers": serde_json::to_value(layer.markers())?,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/plates -- boundaries
// ---------------------------------------------------------------------------

/// Return the plate boundary overlay as a GeoJSON feature collection.
pub async fn get_plates(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let layer = state.plates.read().await;

    Ok(Json(serde_json::json!({
        "status": layer.status(),
        "count": layer.len(),
        "collection": serde_json::to_value(layer.collection())?,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/legend
// ---------------------------------------------------------------------------

/// Return the magnitude legend.
pub async fn get_legend(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    Ok(Json(serde_json::to_value(&state.composition.legend)?))
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Report the population status and item count of each overlay.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (quake_status, quake_count) = {
        let layer = state.earthquakes.read().await;
        (layer.status(), layer.len())
    };
    let (plate_status, plate_count) = {
        let layer = state.plates.read().await;
        (layer.status(), layer.len())
    };

    Json(serde_json::json!({
        "earthquakes": {
            "status": quake_status,
            "count": quake_count,
        },
        "tectonic_plates": {
            "status": plate_status,
            "count": plate_count,
        },
    }))
}
