//! Overlay contents and their population lifecycle.
//!
//! Each overlay starts [`LayerStatus::Pending`] and empty, already attached
//! to the map. Populating replaces its contents wholesale, so populating
//! twice with the same input leaves the same layer, and populating before
//! or after the map is first served ends in the same state.

use quakemap_types::{CircleMarker, FeatureCollection, LayerStatus};

use crate::render::RenderedLayer;

/// The earthquake marker overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeLayer {
    status: LayerStatus,
    markers: Vec<CircleMarker>,
    skipped: usize,
}

impl EarthquakeLayer {
    /// An empty, pending layer.
    pub const fn new() -> Self {
        Self {
            status: LayerStatus::Pending,
            markers: Vec::new(),
            skipped: 0,
        }
    }

    /// Replace the layer contents with a render pass.
    pub fn populate(&mut self, rendered: RenderedLayer) {
        self.markers = rendered.markers;
        self.skipped = rendered.skipped;
        self.status = LayerStatus::Populated;
    }

    /// Current population state.
    pub const fn status(&self) -> LayerStatus {
        self.status
    }

    /// The markers, in feed order.
    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the layer has no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Features dropped during the last render for lacking a point.
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Default for EarthquakeLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// The plate boundary overlay. Features are kept as received and drawn
/// client-side with the overlay's path style.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateLayer {
    status: LayerStatus,
    collection: FeatureCollection,
}

impl PlateLayer {
    /// An empty, pending layer.
    pub fn new() -> Self {
        Self {
            status: LayerStatus::Pending,
            collection: FeatureCollection::empty(),
        }
    }

    /// Replace the layer contents with a fetched collection.
    pub fn populate(&mut self, collection: FeatureCollection) {
        self.collection = collection;
        self.status = LayerStatus::Populated;
    }

    /// Current population state.
    pub const fn status(&self) -> LayerStatus {
        self.status
    }

    /// The boundary features.
    pub const fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Number of boundary features.
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Whether the layer has no features.
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}

impl Default for PlateLayer {
    fn default() -> Self {
        Self::new()
    }
}
