//! Styling, rendering, and map composition for Quakemap.
//!
//! This crate holds the pure parts of the pipeline. It performs no I/O
//! beyond reading the configuration file.
//!
//! # Modules
//!
//! - [`coerce`] -- Browser-style text, number, and date conversion of raw properties
//! - [`config`] -- YAML configuration with environment overrides
//! - [`style`] -- Magnitude band table and radius scale
//! - [`render`] -- Earthquake features to styled circle markers
//! - [`compose`] -- Base layers, overlays, layer control, and legend
//! - [`layer`] -- Overlay contents and their pending/populated lifecycle

pub mod coerce;
pub mod compose;
pub mod config;
pub mod layer;
pub mod render;
pub mod style;

pub use compose::{compose_map, legend};
pub use config::{ConfigError, QuakemapConfig};
pub use layer::{EarthquakeLayer, PlateLayer};
pub use render::{FeatureRenderer, RenderError, RenderedLayer, render_earthquakes};
pub use style::{Band, BandTable, MarkerStyle, StyleError, radius};
