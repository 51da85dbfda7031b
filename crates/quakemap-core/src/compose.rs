//! Map composition: base layers, overlays, layer control, and legend.
//!
//! The composition is built once at startup and never changes. Overlay
//! contents live elsewhere (see [`crate::layer`]) so populating a layer
//! never requires rebuilding the control.

use std::fmt::Write as _;

use quakemap_types::{
    LatLng, LayerControl, LayerKind, Legend, LegendEntry, MapComposition, MapView, Overlay,
    PathStyle, TileLayer,
};

use crate::config::QuakemapConfig;
use crate::style::BandTable;

/// DOM id of the map container on the page.
pub const MAP_CONTAINER_ID: &str = "map";

/// Base layer labels and their tile style ids, in control order.
pub const BASE_STYLES: [(&str, &str); 3] = [
    ("Outdoors", "mapbox/outdoors-v10"),
    ("Satellite", "mapbox/satellite-v9"),
    ("Dark Map", "mapbox/dark-v9"),
];

/// Lower bounds of the legend bands.
pub const LEGEND_GRADES: [u8; 6] = [0, 1, 2, 3, 4, 5];

/// Map corner the legend is anchored to.
pub const LEGEND_POSITION: &str = "bottomleft";

/// Stroke color of plate boundary lines.
pub const PLATE_LINE_COLOR: &str = "brown";

/// Stroke width of plate boundary lines.
pub const PLATE_LINE_WEIGHT: f64 = 2.0;

/// Build the full map description from configuration and the palette.
pub fn compose_map(config: &QuakemapConfig, bands: &BandTable) -> MapComposition {
    let base_layers = base_layers(&config.tiles.url_template, &config.tiles.access_token);
    let overlays = overlays();

    let mut active_layers = Vec::with_capacity(1_usize.saturating_add(overlays.len()));
    if let Some(first) = base_layers.first() {
        active_layers.push(first.name.clone());
    }
    active_layers.extend(overlays.iter().map(|overlay| overlay.name.clone()));

    let [lat, lng] = config.view.center;

    MapComposition {
        view: MapView {
            container_id: MAP_CONTAINER_ID.to_owned(),
            center: LatLng::new(lat, lng),
            zoom: config.view.zoom,
        },
        base_layers,
        overlays,
        active_layers,
        control: LayerControl { collapsed: false },
        legend: legend(bands),
    }
}

/// The three selectable base tile layers.
pub fn base_layers(url_template: &str, access_token: &str) -> Vec<TileLayer> {
    BASE_STYLES
        .iter()
        .map(|(name, style)| TileLayer {
            name: (*name).to_owned(),
            url_template: url_template
                .replace("{style}", style)
                .replace("{token}", access_token),
        })
        .collect()
}

/// The earthquake and plate boundary overlays.
pub fn overlays() -> Vec<Overlay> {
    vec![
        Overlay {
            kind: LayerKind::Earthquakes,
            name: LayerKind::Earthquakes.label().to_owned(),
            endpoint: LayerKind::Earthquakes.endpoint().to_owned(),
            style: None,
        },
        Overlay {
            kind: LayerKind::TectonicPlates,
            name: LayerKind::TectonicPlates.label().to_owned(),
            endpoint: LayerKind::TectonicPlates.endpoint().to_owned(),
            style: Some(PathStyle {
                color: PLATE_LINE_COLOR.to_owned(),
                weight: PLATE_LINE_WEIGHT,
            }),
        },
    ]
}

/// Build the magnitude legend.
///
/// Each grade's swatch uses the color of a magnitude one above the grade,
/// i.e. the color of the band's upper edge.
pub fn legend(bands: &BandTable) -> Legend {
    let mut entries = Vec::with_capacity(LEGEND_GRADES.len());
    let mut html = String::new();

    let mut grades = LEGEND_GRADES.iter().copied().peekable();
    while let Some(grade) = grades.next() {
        let upper = grades.peek().copied();
        let color = bands.color(f64::from(grade) + 1.0).to_owned();

        let _ = write!(html, "<i style=\"background:{color}\"></i> {grade}");
        let label = match upper {
            Some(next) => {
                let _ = write!(html, "&ndash;{next}<br>");
                format!("{grade}\u{2013}{next}")
            }
            None => {
                html.push('+');
                format!("{grade}+")
            }
        };

        entries.push(LegendEntry {
            grade,
            upper,
            color,
            label,
        });
    }

    Legend {
        position: LEGEND_POSITION.to_owned(),
        entries,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::TOP_BAND_COLOR;

    #[test]
    fn default_composition_matches_classic_layout() {
        let map = compose_map(&QuakemapConfig::default(), &BandTable::default());

        assert_eq!(map.view.container_id, "map");
        assert_eq!(map.view.center, LatLng::new(37.09, -95.71));
        assert!((map.view.zoom - 3.25).abs() < f64::EPSILON);

        let names: Vec<&str> = map.base_layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Outdoors", "Satellite", "Dark Map"]);

        let overlays: Vec<&str> = map.overlays.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(overlays, vec!["Earthquakes", "Tectonic Plates"]);

        assert_eq!(
            map.active_layers,
            vec!["Outdoors", "Earthquakes", "Tectonic Plates"]
        );
        assert!(!map.control.collapsed);
        assert_eq!(map.legend.entries.len(), 6);
    }

    #[test]
    fn tile_urls_substitute_style_and_token() {
        let mut config = QuakemapConfig::default();
        config.tiles.access_token = "pk.abc".to_owned();
        let layers = base_layers(&config.tiles.url_template, &config.tiles.access_token);

        let satellite = layers.iter().find(|l| l.name == "Satellite");
        assert_eq!(
            satellite.map(|l| l.url_template.as_str()),
            Some(
                "https://api.mapbox.com/styles/v1/mapbox/satellite-v9/tiles/256/{z}/{x}/{y}?access_token=pk.abc"
            )
        );
    }

    #[test]
    fn plate_overlay_is_brown_weight_two() {
        let plates = overlays()
            .into_iter()
            .find(|o| o.kind == LayerKind::TectonicPlates)
            .and_then(|o| o.style);
        assert_eq!(
            plates,
            Some(PathStyle {
                color: "brown".to_owned(),
                weight: 2.0,
            })
        );
    }

    #[test]
    fn legend_bands_and_swatches() {
        let legend = legend(&BandTable::default());
        assert_eq!(legend.position, "bottomleft");

        let colors: Vec<&str> = legend.entries.iter().map(|e| e.color.as_str()).collect();
        assert_eq!(
            colors,
            vec![
                "#ADAB9E",
                "#ADAB9E",
                "#495056",
                "#3F4E78",
                "#313766",
                TOP_BAND_COLOR
            ]
        );

        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["0\u{2013}1", "1\u{2013}2", "2\u{2013}3", "3\u{2013}4", "4\u{2013}5", "5+"]
        );
        assert_eq!(legend.entries.last().and_then(|e| e.upper), None);
    }

    #[test]
    fn legend_html_layout() {
        let legend = legend(&BandTable::default());
        assert!(
            legend
                .html
                .starts_with("<i style=\"background:#ADAB9E\"></i> 0&ndash;1<br>")
        );
        assert!(legend.html.ends_with("<i style=\"background:#7000E0F\"></i> 5+"));
        assert_eq!(legend.html.matches("<br>").count(), 5);
    }

    #[test]
    fn legend_follows_custom_palette() {
        let bands = BandTable::new(
            vec![crate::style::Band::new(2.5, "#ff0000")],
            "#00ff00".to_owned(),
        )
        .unwrap_or_default();
        let legend = legend(&bands);
        let colors: Vec<&str> = legend.entries.iter().map(|e| e.color.as_str()).collect();
        assert_eq!(
            colors,
            vec!["#00ff00", "#00ff00", "#ff0000", "#ff0000", "#ff0000", "#ff0000"]
        );
    }
}
