//! Shared application state for the map server.
//!
//! [`AppState`] holds the fixed map composition, the two overlays, and the
//! broadcast channel that tells connected pages when an overlay has been
//! populated. Each overlay sits behind its own lock and is written by
//! exactly one fetch task, so the two never contend.

use std::sync::Arc;

use quakemap_core::render::RenderedLayer;
use quakemap_core::{EarthquakeLayer, PlateLayer};
use quakemap_types::{FeatureCollection, LayerEvent, LayerKind, LayerStatus, MapComposition};
use tokio::sync::{RwLock, broadcast};
use tracing::info;

/// Capacity of the broadcast channel for layer events.
///
/// Only two events are ever published per run, so this never lags in
/// practice.
const BROADCAST_CAPACITY: usize = 16;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for layer population events.
    pub tx: broadcast::Sender<LayerEvent>,
    /// The map description served to pages. Immutable after startup.
    pub composition: Arc<MapComposition>,
    /// The earthquake marker overlay.
    pub earthquakes: Arc<RwLock<EarthquakeLayer>>,
    /// The plate boundary overlay.
    pub plates: Arc<RwLock<PlateLayer>>,
}

impl AppState {
    /// Create state for a composed map with both overlays pending.
    pub fn new(composition: MapComposition) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            composition: Arc::new(composition),
            earthquakes: Arc::new(RwLock::new(EarthquakeLayer::new())),
            plates: Arc::new(RwLock::new(PlateLayer::new())),
        }
    }

    /// Subscribe to layer population events.
    pub fn subscribe(&self) -> broadcast::Receiver<LayerEvent> {
        self.tx.subscribe()
    }

    /// One event per overlay that is already populated, in overlay order.
    pub async fn populated_events(&self) -> Vec<LayerEvent> {
        let mut events = Vec::with_capacity(2);
        {
            let layer = self.earthquakes.read().await;
            if layer.status() == LayerStatus::Populated {
                events.push(LayerEvent {
                    layer: LayerKind::Earthquakes,
                    features: layer.len(),
                });
            }
        }
        {
            let layer = self.plates.read().await;
            if layer.status() == LayerStatus::Populated {
                events.push(LayerEvent {
                    layer: LayerKind::TectonicPlates,
                    features: layer.len(),
                });
            }
        }
        events
    }

    /// Subscribe, then snapshot the overlays that are already populated.
    ///
    /// A population that lands between the two steps shows up in the
    /// snapshot, the receiver, or both.
    pub async fn layer_feed(&self) -> (Vec<LayerEvent>, broadcast::Receiver<LayerEvent>) {
        let rx = self.subscribe();
        let snapshot = self.populated_events().await;
        (snapshot, rx)
    }

    /// Replace the earthquake overlay contents and notify pages.
    ///
    /// Returns the number of markers now in the layer.
    pub async fn populate_earthquakes(&self, rendered: RenderedLayer) -> usize {
        let count = {
            let mut layer = self.earthquakes.write().await;
            layer.populate(rendered);
            layer.len()
        };
        info!(markers = count, "earthquake layer populated");
        self.notify(LayerKind::Earthquakes, count);
        count
    }

    /// Replace the plate overlay contents and notify pages.
    ///
    /// Returns the number of boundary features now in the layer.
    pub async fn populate_plates(&self, collection: FeatureCollection) -> usize {
        let count = {
            let mut layer = self.plates.write().await;
            layer.populate(collection);
            layer.len()
        };
        info!(features = count, "plate boundary layer populated");
        self.notify(LayerKind::TectonicPlates, count);
        count
    }

    /// Publish a layer event to all connected pages.
    ///
    /// Returns the number of receivers that got the event. Zero is normal
    /// when no page is open.
    pub fn notify(&self, layer: LayerKind, features: usize) -> usize {
        // send fails only when there are no receivers.
        self.tx
            .send(LayerEvent { layer, features })
            .unwrap_or(0)
    }
}
