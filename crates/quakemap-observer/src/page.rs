//! The interactive map page served at `GET /`.
//!
//! The page is a thin Leaflet client: it embeds the [`MapComposition`]
//! as JSON, builds the base layers, overlay groups, layer control, and
//! legend from it, then opens the layer `WebSocket` and fetches an
//! overlay's endpoint whenever the socket reports it populated. If the
//! socket never opens, each overlay is fetched once instead.

use minijinja::{Environment, Value, context};
use quakemap_types::MapComposition;

use crate::error::ObserverError;

/// Template name. The `.html` suffix turns on HTML auto-escaping.
const PAGE_TEMPLATE_NAME: &str = "index.html";

/// Title shown in the browser tab.
pub const PAGE_TITLE: &str = "Earthquakes and Tectonic Plates";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <style>
    html, body, #{{ container_id }} { height: 100%; margin: 0; padding: 0; }
    .info { padding: 6px 8px; background: rgba(255, 255, 255, 0.85); border-radius: 5px; }
    .legend { line-height: 18px; color: #555; }
    .legend i { width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.9; }
  </style>
</head>
<body>
  <div id="{{ container_id }}"></div>
  <script>
    const composition = {{ composition }};

    const baseMaps = {};
    composition.baseLayers.forEach(function (tile) {
      baseMaps[tile.name] = L.tileLayer(tile.urlTemplate, {
        maxZoom: 18,
        attribution: "Map data &copy; OpenStreetMap contributors, Imagery &copy; Mapbox"
      });
    });

    const overlayMaps = {};
    composition.overlays.forEach(function (overlay) {
      overlayMaps[overlay.name] = L.layerGroup();
    });

    const map = L.map(composition.view.containerId, {
      center: [composition.view.center.lat, composition.view.center.lng],
      zoom: composition.view.zoom,
      zoomSnap: 0.25,
      layers: composition.activeLayers
        .map(function (name) { return baseMaps[name] || overlayMaps[name]; })
        .filter(Boolean)
    });

    L.control.layers(baseMaps, overlayMaps, composition.control).addTo(map);

    const legend = L.control({ position: composition.legend.position });
    legend.onAdd = function () {
      const div = L.DomUtil.create("div", "info legend");
      div.innerHTML = composition.legend.html;
      return div;
    };
    legend.addTo(map);

    function load(overlay) {
      fetch(overlay.endpoint)
        .then(function (response) { return response.json(); })
        .then(function (body) {
          if (body.status !== "populated") { return; }
          const group = overlayMaps[overlay.name];
          group.clearLayers();
          if (overlay.kind === "earthquakes") {
            body.markers.forEach(function (marker) {
              L.circle([marker.latLng.lat, marker.latLng.lng], marker)
                .bindPopup(marker.popup)
                .addTo(group);
            });
          } else {
            L.geoJSON(body.collection, { style: overlay.style }).addTo(group);
          }
        })
        .catch(function (err) { console.error(overlay.name, err); });
    }

    // The socket replays already-populated overlays on connect, then
    // reports each later population. Without a socket, fetch once.
    let live = false;
    function loadAll() { composition.overlays.forEach(load); }

    const scheme = window.location.protocol === "https:" ? "wss://" : "ws://";
    const socket = new WebSocket(scheme + window.location.host + "/ws/layers");
    socket.onopen = function () { live = true; };
    socket.onmessage = function (message) {
      const event = JSON.parse(message.data);
      composition.overlays
        .filter(function (overlay) { return overlay.kind === event.layer; })
        .forEach(load);
    };
    socket.onclose = function () {
      if (!live) { loadAll(); }
    };
  </script>
</body>
</html>
"#;

/// Render the map page for a composition.
///
/// # Errors
///
/// Returns [`ObserverError::Serialization`] if the composition cannot be
/// encoded and [`ObserverError::Template`] if rendering fails.
pub fn render_page(composition: &MapComposition) -> Result<String, ObserverError> {
    let mut env = Environment::new();
    env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
    let template = env.get_template(PAGE_TEMPLATE_NAME)?;

    let html = template.render(context! {
        title => PAGE_TITLE,
        container_id => composition.view.container_id,
        composition => Value::from_safe_string(script_json(composition)?),
    })?;
    Ok(html)
}

/// Encode a value as JSON that is safe to inline in a `<script>` block.
fn script_json(composition: &MapComposition) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(composition)?;
    Ok(json.replace("</", "<\\/"))
}
