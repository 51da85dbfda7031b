//! Configuration loading and typed config structures for Quakemap.
//!
//! The canonical configuration lives in `quakemap-config.yaml` at the project
//! root. Every field has a default, so an absent file or an empty document
//! yields a working setup pointed at the public USGS and plate-boundary feeds.

use std::path::Path;

use serde::Deserialize;

use crate::style::{Band, BandTable, StyleError};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<StyleError> for ConfigError {
    fn from(err: StyleError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Top-level Quakemap configuration.
///
/// Mirrors the structure of `quakemap-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuakemapConfig {
    /// Feed endpoints.
    #[serde(default)]
    pub feeds: FeedsConfig,

    /// Base tile layer settings.
    #[serde(default)]
    pub tiles: TilesConfig,

    /// Initial map view.
    #[serde(default)]
    pub view: ViewConfig,

    /// Magnitude palette.
    #[serde(default)]
    pub style: StyleConfig,

    /// HTTP server binding.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl QuakemapConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values (see
    /// [`QuakemapConfig::apply_env_overrides`]).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load configuration from `path`, falling back to defaults (plus
    /// environment overrides) when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override values with environment variables when set:
    ///
    /// - `QUAKEMAP_EARTHQUAKES_URL` overrides `feeds.earthquakes_url`
    /// - `QUAKEMAP_PLATES_URL` overrides `feeds.plates_url`
    /// - `MAPBOX_ACCESS_TOKEN` overrides `tiles.access_token`
    /// - `QUAKEMAP_PORT` overrides `server.port` (ignored if not a port)
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("QUAKEMAP_EARTHQUAKES_URL") {
            self.feeds.earthquakes_url = val;
        }
        if let Some(val) = lookup("QUAKEMAP_PLATES_URL") {
            self.feeds.plates_url = val;
        }
        if let Some(val) = lookup("MAPBOX_ACCESS_TOKEN") {
            self.tiles.access_token = val;
        }
        if let Some(val) = lookup("QUAKEMAP_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!(value = val, error = %e, "ignoring invalid QUAKEMAP_PORT"),
            }
        }
    }

    /// Check values that deserialize fine but cannot drive the map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.view.zoom.is_finite() || self.view.zoom < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "view.zoom must be a non-negative number, got {}",
                self.view.zoom
            )));
        }
        if !self.tiles.url_template.contains("{style}") {
            return Err(ConfigError::Invalid(
                "tiles.url_template must contain a {style} placeholder".to_owned(),
            ));
        }
        self.style.band_table()?;
        Ok(())
    }
}

/// Feed endpoints and client identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedsConfig {
    /// Earthquake `FeatureCollection` URL.
    #[serde(default = "default_earthquakes_url")]
    pub earthquakes_url: String,

    /// Plate boundary `FeatureCollection` URL.
    #[serde(default = "default_plates_url")]
    pub plates_url: String,

    /// `User-Agent` header sent with feed requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            earthquakes_url: default_earthquakes_url(),
            plates_url: default_plates_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Base tile layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TilesConfig {
    /// Access token appended to tile URLs.
    #[serde(default)]
    pub access_token: String,

    /// Tile URL template. `{style}` and `{token}` are substituted at
    /// composition time; `{z}`, `{x}`, `{y}` are left for the map library.
    #[serde(default = "default_url_template")]
    pub url_template: String,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            url_template: default_url_template(),
        }
    }
}

/// Initial map view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewConfig {
    /// `[lat, lng]` of the initial center.
    #[serde(default = "default_center")]
    pub center: [f64; 2],

    /// Initial zoom level.
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
        }
    }
}

/// Magnitude palette.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyleConfig {
    /// Bands in descending threshold order.
    #[serde(default = "default_bands")]
    pub bands: Vec<Band>,

    /// Color for magnitudes at or below every threshold.
    #[serde(default = "default_fallback_color")]
    pub fallback: String,
}

impl StyleConfig {
    /// Build the validated band table.
    pub fn band_table(&self) -> Result<BandTable, StyleError> {
        BandTable::new(self.bands.clone(), self.fallback.clone())
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            fallback: default_fallback_color(),
        }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_earthquakes_url() -> String {
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson".to_owned()
}

fn default_plates_url() -> String {
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json"
        .to_owned()
}

fn default_user_agent() -> String {
    concat!("quakemap/", env!("CARGO_PKG_VERSION")).to_owned()
}

fn default_url_template() -> String {
    "https://api.mapbox.com/styles/v1/{style}/tiles/256/{z}/{x}/{y}?access_token={token}".to_owned()
}

const fn default_center() -> [f64; 2] {
    [37.09, -95.71]
}

const fn default_zoom() -> f64 {
    3.25
}

fn default_bands() -> Vec<Band> {
    crate::style::default_bands()
}

fn default_fallback_color() -> String {
    crate::style::DEFAULT_FALLBACK_COLOR.to_owned()
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}
