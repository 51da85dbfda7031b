//! Feed loader tasks.
//!
//! Each overlay has its own task: fetch the feed, turn it into layer
//! contents, populate the layer, and announce it to connected pages. The
//! two tasks never wait on each other. A failed fetch is logged and the
//! layer stays pending; nothing retries.

use std::sync::Arc;

use quakemap_core::{BandTable, render_earthquakes};
use quakemap_feeds::FeedClient;
use quakemap_observer::AppState;
use quakemap_types::LayerKind;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::EngineError;

/// Fetch the earthquake feed, render its markers, and populate the layer.
///
/// Returns the number of markers placed.
pub async fn load_earthquakes(
    client: &FeedClient,
    url: &str,
    bands: &BandTable,
    state: &AppState,
) -> Result<usize, EngineError> {
    let collection = client.fetch_collection(url).await?;
    let rendered = render_earthquakes(&collection, bands)?;
    if rendered.skipped > 0 {
        warn!(
            skipped = rendered.skipped,
            "earthquake features without point geometry were not drawn"
        );
    }
    Ok(state.populate_earthquakes(rendered).await)
}

/// Fetch the plate boundary feed and populate the layer.
///
/// Returns the number of boundary features added.
pub async fn load_plates(
    client: &FeedClient,
    url: &str,
    state: &AppState,
) -> Result<usize, EngineError> {
    let collection = client.fetch_collection(url).await?;
    Ok(state.populate_plates(collection).await)
}

/// Spawn the earthquake loader on a background task.
pub fn spawn_earthquake_loader(
    client: FeedClient,
    url: String,
    bands: BandTable,
    state: Arc<AppState>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = load_earthquakes(&client, &url, &bands, &state).await;
        report(LayerKind::Earthquakes, &url, result);
    })
}

/// Spawn the plate boundary loader on a background task.
pub fn spawn_plate_loader(client: FeedClient, url: String, state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = load_plates(&client, &url, &state).await;
        report(LayerKind::TectonicPlates, &url, result);
    })
}

fn report(layer: LayerKind, url: &str, result: Result<usize, EngineError>) {
    match result {
        Ok(count) => info!(%layer, url, count, "layer loaded"),
        Err(e) => error!(%layer, url, error = %e, "layer load failed, leaving it empty"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use quakemap_core::{QuakemapConfig, compose_map};
    use quakemap_types::LayerStatus;

    use super::*;

    const QUAKES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "properties": {"mag": 4.2, "place": "North", "time": 1552410000000},
             "geometry": {"type": "Point", "coordinates": [-116.79, 33.49, 12.3]}},
            {"type": "Feature",
             "properties": {"mag": 2.5, "place": "Offshore", "time": 1552410060000},
             "geometry": null}
        ]
    }"#;

    const PLATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "properties": {"Name": "AF-AN"},
             "geometry": {"type": "LineString", "coordinates": [[-0.43, -54.85], [-0.03, -54.67]]}}
        ]
    }"#;

    async fn serve_fixtures() -> SocketAddr {
        let router = Router::new()
            .route("/quakes.geojson", get(|| async { QUAKES }))
            .route("/plates.json", get(|| async { PLATES }))
            .route(
                "/down.json",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn state() -> Arc<AppState> {
        let composition = compose_map(&QuakemapConfig::default(), &BandTable::default());
        Arc::new(AppState::new(composition))
    }

    fn client() -> FeedClient {
        FeedClient::new("quakemap-tests").unwrap()
    }

    #[tokio::test]
    async fn earthquakes_load_into_layer() {
        let addr = serve_fixtures().await;
        let state = state();

        let count = load_earthquakes(
            &client(),
            &format!("http://{addr}/quakes.geojson"),
            &BandTable::default(),
            &state,
        )
        .await
        .unwrap();

        assert_eq!(count, 1);
        let layer = state.earthquakes.read().await;
        assert_eq!(layer.status(), LayerStatus::Populated);
        assert_eq!(layer.skipped(), 1);
        assert_eq!(
            layer.markers().first().map(|m| m.fill_color.as_str()),
            Some("#313766")
        );
    }

    #[tokio::test]
    async fn failed_fetch_leaves_layer_pending() {
        let addr = serve_fixtures().await;
        let state = state();

        let result = load_plates(&client(), &format!("http://{addr}/down.json"), &state).await;

        assert!(matches!(result, Err(EngineError::Feed { .. })));
        assert_eq!(state.plates.read().await.status(), LayerStatus::Pending);
    }

    #[tokio::test]
    async fn loaders_run_independently() {
        let addr = serve_fixtures().await;
        let state = state();
        let mut rx = state.subscribe();

        let quakes = spawn_earthquake_loader(
            client(),
            format!("http://{addr}/down.json"),
            BandTable::default(),
            Arc::clone(&state),
        );
        let plates = spawn_plate_loader(
            client(),
            format!("http://{addr}/plates.json"),
            Arc::clone(&state),
        );
        quakes.await.unwrap();
        plates.await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.layer, LayerKind::TectonicPlates);
        assert_eq!(state.plates.read().await.len(), 1);
        assert_eq!(state.earthquakes.read().await.status(), LayerStatus::Pending);
    }
}
