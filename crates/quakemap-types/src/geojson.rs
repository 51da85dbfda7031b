//! GeoJSON documents as returned by the earthquake and plate-boundary feeds.
//!
//! Only the parts of RFC 7946 the map needs are typed. Feature `properties`
//! and `id` stay opaque JSON so foreign members survive a round trip to the
//! browser untouched.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// A GeoJSON position: `[longitude, latitude]` with an optional third
/// member (depth in kilometres for the earthquake feed).
pub type Position = Vec<f64>;

/// The geometry of a single feature.
///
/// Internally tagged on `type`, matching GeoJSON's
/// `{"type": "...", "coordinates": ...}` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type")]
#[ts(export, export_to = "bindings/")]
pub enum Geometry {
    /// A single position.
    Point {
        /// The position.
        coordinates: Position,
    },
    /// Several unconnected positions.
    MultiPoint {
        /// The positions.
        coordinates: Vec<Position>,
    },
    /// A polyline.
    LineString {
        /// The vertices, in order.
        coordinates: Vec<Position>,
    },
    /// Several polylines.
    MultiLineString {
        /// One vertex list per polyline.
        coordinates: Vec<Vec<Position>>,
    },
    /// A polygon given as linear rings, exterior first.
    Polygon {
        /// The rings.
        coordinates: Vec<Vec<Position>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// One ring list per polygon.
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    /// A heterogeneous group of geometries.
    GeometryCollection {
        /// The member geometries.
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// A `Point` at `position`.
    pub const fn point(position: Position) -> Self {
        Self::Point {
            coordinates: position,
        }
    }

    /// A `LineString` through `vertices`.
    pub const fn line_string(vertices: Vec<Position>) -> Self {
        Self::LineString {
            coordinates: vertices,
        }
    }

    /// Return the `(longitude, latitude)` of a `Point`, or `None` for any
    /// other geometry or a point with fewer than two members.
    pub fn point_lng_lat(&self) -> Option<(f64, f64)> {
        match self {
            Self::Point { coordinates } => match coordinates.as_slice() {
                [lng, lat, ..] => Some((*lng, *lat)),
                _ => None,
            },
            _ => None,
        }
    }

    /// The GeoJSON type name of this geometry.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::LineString { .. } => "LineString",
            Self::MultiLineString { .. } => "MultiLineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
            Self::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

/// A single GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Feature {
    /// Always `"Feature"`.
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    /// Optional feature identifier (string or number in the wild).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<serde_json::Value>,
    /// The feature geometry; GeoJSON allows `null`. A geometry that is not
    /// one of the RFC 7946 types, or is malformed, reads as `None` so the
    /// rest of the collection still loads.
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<Geometry>,
    /// Arbitrary properties object.
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl Feature {
    /// Build a feature from a geometry and a properties object.
    pub fn new(geometry: Geometry, properties: serde_json::Value) -> Self {
        Self {
            kind: feature_type(),
            id: None,
            geometry: Some(geometry),
            properties,
        }
    }
}

/// An ordered sequence of features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type", default = "feature_collection_type")]
    pub kind: String,
    /// The features, in feed order.
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Build a collection from a list of features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: feature_collection_type(),
            features,
        }
    }

    /// An empty collection.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of features in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::empty()
    }
}

fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

fn feature_type() -> String {
    String::from("Feature")
}

fn feature_collection_type() -> String {
    String::from("FeatureCollection")
}
