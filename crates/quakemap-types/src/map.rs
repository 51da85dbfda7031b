//! Map description handed to the browser page.
//!
//! Field names serialize in `camelCase` so marker and path option objects
//! can be passed straight to the mapping library on the page.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// A latitude/longitude pair in degrees.
///
/// GeoJSON orders coordinates `(lng, lat)`; map libraries expect
/// `(lat, lng)`. This type is always the latter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Create a new pair.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ---------------------------------------------------------------------------
// Earthquake markers
// ---------------------------------------------------------------------------

/// A circle marker for one earthquake, sized and colored by magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CircleMarker {
    /// Marker center.
    pub lat_lng: LatLng,
    /// Radius in metres. Non-finite when the magnitude is missing, which
    /// serializes as `null`.
    pub radius: f64,
    /// CSS fill color from the magnitude band table.
    pub fill_color: String,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// CSS stroke color.
    pub color: String,
    /// Whether the outline is drawn.
    pub stroke: bool,
    /// Outline width in pixels.
    pub weight: f64,
    /// Popup HTML.
    pub popup: String,
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// A selectable base tile layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TileLayer {
    /// Label shown in the layer control.
    pub name: String,
    /// Tile URL template with `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
}

/// Stroke options for line overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PathStyle {
    /// CSS stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
}

/// Which overlay a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LayerKind {
    /// Styled earthquake markers.
    Earthquakes,
    /// Tectonic plate boundary polylines.
    TectonicPlates,
}

impl LayerKind {
    /// Label shown in the layer control.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Earthquakes => "Earthquakes",
            Self::TectonicPlates => "Tectonic Plates",
        }
    }

    /// Server path the page fetches the layer contents from.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Earthquakes => "/api/earthquakes",
            Self::TectonicPlates => "/api/plates",
        }
    }
}

impl core::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A toggleable overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Overlay {
    /// Which layer this is.
    pub kind: LayerKind,
    /// Label shown in the layer control.
    pub name: String,
    /// Server path serving the layer contents.
    pub endpoint: String,
    /// Line style, for polyline overlays.
    pub style: Option<PathStyle>,
}

/// Options for the base/overlay switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LayerControl {
    /// Whether the control starts collapsed.
    pub collapsed: bool,
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// One magnitude band in the legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LegendEntry {
    /// Lower bound of the band.
    pub grade: u8,
    /// Upper bound, absent for the open-ended top band.
    pub upper: Option<u8>,
    /// Swatch color.
    pub color: String,
    /// Text label, e.g. `2–3` or `5+`.
    pub label: String,
}

/// The magnitude legend control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Legend {
    /// Map corner the control is anchored to.
    pub position: String,
    /// Bands in ascending magnitude order.
    pub entries: Vec<LegendEntry>,
    /// Pre-rendered inner HTML of the legend box.
    pub html: String,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Initial view of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MapView {
    /// DOM id of the element the map renders into.
    pub container_id: String,
    /// Initial center.
    pub center: LatLng,
    /// Initial zoom level (fractional zoom allowed).
    pub zoom: f64,
}

/// Everything the page needs to build the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MapComposition {
    /// Initial view.
    pub view: MapView,
    /// Selectable base layers, in control order.
    pub base_layers: Vec<TileLayer>,
    /// Toggleable overlays, in control order.
    pub overlays: Vec<Overlay>,
    /// Names of the layers shown on load.
    pub active_layers: Vec<String>,
    /// Layer switcher options.
    pub control: LayerControl,
    /// Magnitude legend.
    pub legend: Legend,
}

// ---------------------------------------------------------------------------
// Layer lifecycle
// ---------------------------------------------------------------------------

/// Population state of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LayerStatus {
    /// Attached to the map, waiting for its feed.
    Pending,
    /// Contents have arrived.
    Populated,
}

/// Pushed over the `WebSocket` when an overlay is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LayerEvent {
    /// The overlay that changed.
    pub layer: LayerKind,
    /// Number of items now in the layer.
    pub features: usize,
}
