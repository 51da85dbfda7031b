//! Earthquake feature rendering.
//!
//! Each earthquake feature becomes one [`CircleMarker`] with a popup giving
//! its magnitude, place, and origin time. Features are rendered
//! independently, in input order, with no batching or deduplication.
//!
//! Properties are not patched up. They go through the conversions in
//! [`crate::coerce`]: an absent magnitude reads `undefined` and gives a
//! `NaN` radius, a `null` one reads `null` and gives radius `0`, and a
//! numeric string is styled like the number it spells.

use chrono::DateTime;
use minijinja::{Environment, context};
use quakemap_types::{
    CircleMarker, EarthquakeProperties, Feature, FeatureCollection, LatLng,
};
use tracing::debug;

use crate::coerce;
use crate::style::BandTable;

/// Stroke color of every marker.
pub const MARKER_STROKE_COLOR: &str = "#000";

/// Stroke width of every marker.
pub const MARKER_STROKE_WEIGHT: f64 = 0.8;

/// Fill opacity of every marker.
pub const MARKER_FILL_OPACITY: f64 = 0.6;

/// Text shown for an absent or unrepresentable timestamp.
pub const INVALID_DATE: &str = "Invalid Date";

// Named `.html` so minijinja auto-escapes the substituted values.
const POPUP_TEMPLATE_NAME: &str = "popup.html";
const POPUP_TEMPLATE: &str =
    "<h3>Magnitude: {{ magnitude }}</h3><h3>Location: {{ place }}</h3><hr><p>{{ time }}</p>";

/// Errors raised while rendering markers.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The popup template failed to compile or render.
    #[error("popup template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Output of one render pass over an earthquake collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedLayer {
    /// One marker per point feature, in input order.
    pub markers: Vec<CircleMarker>,
    /// Features that had no point geometry and produced no marker.
    pub skipped: usize,
}

/// Renders earthquake features into styled markers.
pub struct FeatureRenderer {
    env: Environment<'static>,
    bands: BandTable,
}

impl FeatureRenderer {
    /// Create a renderer using the given band table for fill colors.
    pub fn new(bands: BandTable) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template(POPUP_TEMPLATE_NAME, POPUP_TEMPLATE)?;
        Ok(Self { env, bands })
    }

    /// The band table this renderer colors markers with.
    pub const fn bands(&self) -> &BandTable {
        &self.bands
    }

    /// Render every feature of an earthquake collection.
    pub fn render_collection(
        &self,
        collection: &FeatureCollection,
    ) -> Result<RenderedLayer, RenderError> {
        let mut layer = RenderedLayer {
            markers: Vec::with_capacity(collection.len()),
            skipped: 0,
        };

        for feature in &collection.features {
            match self.render_feature(feature)? {
                Some(marker) => layer.markers.push(marker),
                None => {
                    debug!(
                        id = ?feature.id,
                        geometry = feature.geometry.as_ref().map(quakemap_types::Geometry::type_name),
                        "earthquake feature has no point geometry, skipping"
                    );
                    layer.skipped = layer.skipped.saturating_add(1);
                }
            }
        }

        Ok(layer)
    }

    /// Render one feature, or `None` when it has no point geometry.
    pub fn render_feature(&self, feature: &Feature) -> Result<Option<CircleMarker>, RenderError> {
        let Some((lng, lat)) = feature
            .geometry
            .as_ref()
            .and_then(quakemap_types::Geometry::point_lng_lat)
        else {
            return Ok(None);
        };

        let props = EarthquakeProperties::from_properties(&feature.properties);
        let magnitude = coerce::to_number(props.mag.as_ref());
        let style = self.bands.style(magnitude);

        Ok(Some(CircleMarker {
            lat_lng: LatLng::new(lat, lng),
            radius: style.radius,
            fill_color: style.fill_color,
            fill_opacity: MARKER_FILL_OPACITY,
            color: MARKER_STROKE_COLOR.to_owned(),
            stroke: true,
            weight: MARKER_STROKE_WEIGHT,
            popup: self.popup(&props)?,
        }))
    }

    /// Popup HTML for one earthquake.
    pub fn popup(&self, props: &EarthquakeProperties) -> Result<String, RenderError> {
        let magnitude = coerce::to_text(props.mag.as_ref());
        let place = coerce::to_text(props.place.as_ref());
        let time = coerce::to_epoch_millis(props.time.as_ref())
            .map_or_else(|| INVALID_DATE.to_owned(), format_time);

        let html = self
            .env
            .get_template(POPUP_TEMPLATE_NAME)?
            .render(context! { magnitude, place, time })?;
        Ok(html)
    }
}

/// Render an earthquake collection with the given band table.
pub fn render_earthquakes(
    collection: &FeatureCollection,
    bands: &BandTable,
) -> Result<RenderedLayer, RenderError> {
    FeatureRenderer::new(bands.clone())?.render_collection(collection)
}

/// Format epoch milliseconds the way a browser prints a date in UTC, e.g.
/// `Tue Mar 12 2019 17:00:00 GMT+0000 (Coordinated Universal Time)`.
pub fn format_time(epoch_millis: i64) -> String {
    DateTime::from_timestamp_millis(epoch_millis).map_or_else(
        || INVALID_DATE.to_owned(),
        |dt| {
            format!(
                "{} (Coordinated Universal Time)",
                dt.format("%a %b %d %Y %H:%M:%S GMT%z")
            )
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quakemap_types::Geometry;
    use serde_json::json;

    use super::*;

    fn quake(lng: f64, lat: f64, props: serde_json::Value) -> Feature {
        Feature::new(Geometry::point(vec![lng, lat, 10.0]), props)
    }

    fn renderer() -> FeatureRenderer {
        FeatureRenderer::new(BandTable::default()).unwrap()
    }

    fn render_one(props: serde_json::Value) -> CircleMarker {
        let marker = renderer().render_feature(&quake(0.0, 0.0, props)).unwrap();
        assert!(marker.is_some(), "point feature produced no marker");
        marker.unwrap()
    }

    fn render_all(collection: &FeatureCollection) -> RenderedLayer {
        render_earthquakes(collection, &BandTable::default()).unwrap()
    }

    #[test]
    fn one_marker_per_feature_in_order() {
        let collection = FeatureCollection::new(vec![
            quake(-116.8, 33.5, json!({"mag": 1.2, "place": "A", "time": 0})),
            quake(-155.3, 19.4, json!({"mag": 4.2, "place": "B", "time": 0})),
            quake(142.0, 38.3, json!({"mag": 6.1, "place": "C", "time": 0})),
        ]);

        let layer = render_all(&collection);
        assert_eq!(layer.markers.len(), 3);
        assert_eq!(layer.skipped, 0);

        let places: Vec<bool> = layer
            .markers
            .iter()
            .zip(["A", "B", "C"])
            .map(|(m, p)| m.popup.contains(&format!("Location: {p}")))
            .collect();
        assert_eq!(places, vec![true, true, true]);
    }

    #[test]
    fn marker_takes_style_and_swaps_coordinates() {
        let feature = quake(
            -116.79,
            33.49,
            json!({"mag": 4.2, "place": "Somewhere", "time": 1_552_410_000_000_i64}),
        );
        let marker = renderer().render_feature(&feature).unwrap();
        assert!(marker.is_some());
        let marker = marker.unwrap();

        assert_eq!(marker.lat_lng, LatLng::new(33.49, -116.79));
        assert!((marker.radius - 105_000.0).abs() < 1e-6);
        assert_eq!(marker.fill_color, "#313766");
        assert_eq!(marker.color, "#000");
        assert!(marker.stroke);
        assert!((marker.fill_opacity - 0.6).abs() < f64::EPSILON);
        assert!((marker.weight - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn popup_contains_magnitude_place_and_time() {
        let props = EarthquakeProperties::from_properties(&json!({
            "mag": 4.2,
            "place": "10km SSW of Idyllwild, CA",
            "time": 1_552_410_000_000_i64
        }));
        let popup = renderer().popup(&props);
        assert_eq!(
            popup.ok().as_deref(),
            Some(
                "<h3>Magnitude: 4.2</h3><h3>Location: 10km SSW of Idyllwild, CA</h3><hr>\
                 <p>Tue Mar 12 2019 17:00:00 GMT+0000 (Coordinated Universal Time)</p>"
            )
        );
    }

    #[test]
    fn whole_magnitudes_print_without_fraction() {
        let marker = render_one(json!({"mag": 5.0, "place": "X", "time": 0}));
        assert!(marker.popup.starts_with("<h3>Magnitude: 5</h3>"));
    }

    #[test]
    fn absent_properties_render_as_undefined() {
        let marker = render_one(json!({}));
        assert!(marker.popup.contains("Magnitude: undefined"));
        assert!(marker.popup.contains("Location: undefined"));
        assert!(marker.popup.contains("<p>Invalid Date</p>"));
        assert!(marker.radius.is_nan());
        assert_eq!(marker.fill_color, "#ADAB9E");
    }

    #[test]
    fn null_properties_render_as_null() {
        let marker = render_one(json!({"mag": null, "place": null, "time": null}));
        assert!(marker.popup.contains("Magnitude: null"));
        assert!(marker.popup.contains("Location: null"));
        assert!(marker.popup.contains("<p>Thu Jan 01 1970 00:00:00 GMT+0000"));
        assert!(marker.radius.abs() < f64::EPSILON);
        assert_eq!(marker.fill_color, "#ADAB9E");
    }

    #[test]
    fn numeric_string_magnitude_is_styled_as_a_number() {
        let marker = render_one(json!({
            "mag": "4.2",
            "place": "Somewhere",
            "time": 1_552_410_000_000.0
        }));
        assert!((marker.radius - 105_000.0).abs() < 1e-6);
        assert_eq!(marker.fill_color, "#313766");
        assert!(marker.popup.contains("Magnitude: 4.2"));
        assert!(marker.popup.contains("<p>Tue Mar 12 2019 17:00:00 GMT+0000"));
    }

    #[test]
    fn unparseable_magnitude_falls_back() {
        let marker = render_one(json!({"mag": "big"}));
        assert!(marker.radius.is_nan());
        assert_eq!(marker.fill_color, "#ADAB9E");
        assert!(marker.popup.contains("Magnitude: big"));
    }

    #[test]
    fn place_text_is_html_escaped() {
        let marker = render_one(json!({"mag": 1.0, "place": "<b>Bold</b> & Co"}));
        assert!(marker.popup.contains("&lt;b&gt;Bold&lt;"));
        assert!(marker.popup.contains("&amp; Co"));
        assert!(!marker.popup.contains("<b>"));
    }

    #[test]
    fn non_point_features_are_skipped() {
        let collection = FeatureCollection::new(vec![
            quake(1.0, 2.0, json!({"mag": 2.5})),
            Feature::new(
                Geometry::line_string(vec![vec![0.0, 0.0], vec![1.0, 1.0]]),
                json!({"mag": 3.0}),
            ),
        ]);
        let layer = render_all(&collection);
        assert_eq!(layer.markers.len(), 1);
        assert_eq!(layer.skipped, 1);
    }

    #[test]
    fn empty_collection_yields_no_markers() {
        let layer = render_all(&FeatureCollection::empty());
        assert!(layer.markers.is_empty());
        assert_eq!(layer.skipped, 0);
    }

    #[test]
    fn time_formatting() {
        assert_eq!(
            format_time(0),
            "Thu Jan 01 1970 00:00:00 GMT+0000 (Coordinated Universal Time)"
        );
        assert_eq!(format_time(i64::MAX), INVALID_DATE);
    }
}
