//! Magnitude-to-style mapping.
//!
//! Fill color comes from an ordered table of `(threshold, color)` bands,
//! scanned once in descending threshold order: the first band whose
//! threshold the magnitude strictly exceeds wins, and anything at or below
//! every threshold takes the fallback color. Radius is a plain linear scale.
//!
//! Missing magnitudes are represented as `NaN`. `NaN` exceeds no threshold,
//! so it takes the fallback color, and its radius is `NaN`.

use serde::{Deserialize, Serialize};

/// Metres of circle radius per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 25_000.0;

/// Color of the open-ended top band.
///
/// This literal has seven hex digits and is not a valid CSS color, so
/// browsers ignore it and draw the library default fill. It is kept as
/// received; [`BandTable::invalid_colors`] reports it and the palette can be
/// overridden in configuration.
pub const TOP_BAND_COLOR: &str = "#7000E0F";

/// Color for magnitudes at or below the lowest threshold.
pub const DEFAULT_FALLBACK_COLOR: &str = "#ADAB9E";

/// The default palette, highest threshold first.
pub fn default_bands() -> Vec<Band> {
    vec![
        Band::new(5.0, TOP_BAND_COLOR),
        Band::new(4.0, "#313766"),
        Band::new(3.0, "#3F4E78"),
        Band::new(2.0, "#495056"),
        Band::new(1.0, "#ADAB9E"),
    ]
}

/// Errors raised while building a band table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// Thresholds are not strictly descending.
    #[error("band thresholds must be strictly descending: {previous} is followed by {next}")]
    UnorderedThresholds {
        /// The earlier threshold.
        previous: String,
        /// The offending threshold that follows it.
        next: String,
    },

    /// A threshold is `NaN` or infinite.
    #[error("band threshold must be finite, got {0}")]
    NonFiniteThreshold(String),
}

/// One magnitude band: magnitudes strictly above `threshold` use `color`
/// unless a higher band already matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Exclusive lower bound.
    pub threshold: f64,
    /// CSS color.
    pub color: String,
}

impl Band {
    /// Create a band.
    pub fn new(threshold: f64, color: &str) -> Self {
        Self {
            threshold,
            color: color.to_owned(),
        }
    }
}

/// Fill color and radius for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Radius in metres.
    pub radius: f64,
    /// CSS fill color.
    pub fill_color: String,
}

/// Ordered band table used for fill colors and the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<Band>,
    fallback: String,
}

impl BandTable {
    /// Build a table from bands given highest threshold first.
    pub fn new(bands: Vec<Band>, fallback: String) -> Result<Self, StyleError> {
        for band in &bands {
            if !band.threshold.is_finite() {
                return Err(StyleError::NonFiniteThreshold(band.threshold.to_string()));
            }
        }
        for pair in bands.windows(2) {
            let [previous, next] = pair else {
                continue;
            };
            if next.threshold >= previous.threshold {
                return Err(StyleError::UnorderedThresholds {
                    previous: previous.threshold.to_string(),
                    next: next.threshold.to_string(),
                });
            }
        }
        Ok(Self { bands, fallback })
    }

    /// The bands, highest threshold first.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Color for magnitudes at or below every threshold.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Fill color for a magnitude.
    pub fn color(&self, magnitude: f64) -> &str {
        self.bands
            .iter()
            .find(|band| magnitude > band.threshold)
            .map_or(self.fallback.as_str(), |band| band.color.as_str())
    }

    /// Radius and fill color together.
    pub fn style(&self, magnitude: f64) -> MarkerStyle {
        MarkerStyle {
            radius: radius(magnitude),
            fill_color: self.color(magnitude).to_owned(),
        }
    }

    /// Palette entries (band colors and the fallback) that are not valid
    /// CSS hex colors.
    pub fn invalid_colors(&self) -> Vec<&str> {
        self.bands
            .iter()
            .map(|band| band.color.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .filter(|color| !is_css_hex_color(color))
            .collect()
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            fallback: DEFAULT_FALLBACK_COLOR.to_owned(),
        }
    }
}

/// Circle radius in metres for a magnitude. Not clamped: zero gives zero,
/// negatives give negative radii, `NaN` stays `NaN`.
pub fn radius(magnitude: f64) -> f64 {
    magnitude * RADIUS_PER_MAGNITUDE
}

/// Whether `color` is `#` followed by 3, 4, 6, or 8 hex digits.
pub fn is_css_hex_color(color: &str) -> bool {
    color.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}
