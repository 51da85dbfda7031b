//! Shared type definitions for Quakemap.
//!
//! This crate is the single source of truth for the GeoJSON documents the
//! feeds return and the map description the server hands to the browser.
//! Map types flow downstream to `TypeScript` via `ts-rs` for the page script.
//!
//! # Modules
//!
//! - [`geojson`] -- `FeatureCollection`, `Feature`, and `Geometry`
//! - [`earthquake`] -- Lenient view over earthquake feature properties
//! - [`map`] -- Markers, tile layers, overlays, legend, and layer events

pub mod earthquake;
pub mod geojson;
pub mod map;

// Re-export all public types at crate root for convenience.
pub use earthquake::EarthquakeProperties;
pub use geojson::{Feature, FeatureCollection, Geometry, Position};
pub use map::{
    CircleMarker, LatLng, LayerControl, LayerEvent, LayerKind, LayerStatus, Legend, LegendEntry,
    MapComposition, MapView, Overlay, PathStyle, TileLayer,
};

#[cfg(test)]
mod tests {
    //! Binding generation for the page script.

    #[test]
    fn export_bindings() {
        // Importing the types triggers generation into `bindings/`
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::map::LatLng::export_all();
        let _ = crate::map::CircleMarker::export_all();
        let _ = crate::map::TileLayer::export_all();
        let _ = crate::map::PathStyle::export_all();
        let _ = crate::map::Overlay::export_all();
        let _ = crate::map::LayerControl::export_all();
        let _ = crate::map::LegendEntry::export_all();
        let _ = crate::map::Legend::export_all();
        let _ = crate::map::MapView::export_all();
        let _ = crate::map::MapComposition::export_all();
        let _ = crate::map::LayerKind::export_all();
        let _ = crate::map::LayerStatus::export_all();
        let _ = crate::map::LayerEvent::export_all();
        let _ = crate::geojson::Geometry::export_all();
        let _ = crate::geojson::Feature::export_all();
        let _ = crate::geojson::FeatureCollection::export_all();
    }
}
