//! The popup properties of an earthquake feature.
//!
//! The feed schema is owned externally, so values are kept exactly as
//! received. An absent member and a member that is present but `null` are
//! different things: the first reads `undefined`, the second `null`.
//! Interpreting the values is left to the renderer.

use serde_json::Value;

/// The three properties a marker popup reports, as raw JSON.
///
/// `None` means the member is absent from the feature's `properties`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarthquakeProperties {
    /// Magnitude. Usually a number, occasionally `null`.
    pub mag: Option<Value>,
    /// Human-readable location.
    pub place: Option<Value>,
    /// Origin time in milliseconds since the Unix epoch.
    pub time: Option<Value>,
}

impl EarthquakeProperties {
    /// Extract the popup properties from a feature's `properties` object.
    ///
    /// A non-object `properties` yields all members absent.
    pub fn from_properties(properties: &Value) -> Self {
        Self {
            mag: properties.get("mag").cloned(),
            place: properties.get("place").cloned(),
            time: properties.get("time").cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_usgs_properties() {
        let props = serde_json::json!({
            "mag": 2.5,
            "place": "5km W of Volcano, Hawaii",
            "time": 1_552_410_000_000_i64,
            "tsunami": 0
        });
        let quake = EarthquakeProperties::from_properties(&props);
        assert_eq!(quake.mag, Some(serde_json::json!(2.5)));
        assert_eq!(quake.place, Some(serde_json::json!("5km W of Volcano, Hawaii")));
        assert_eq!(quake.time, Some(serde_json::json!(1_552_410_000_000_i64)));
    }

    #[test]
    fn null_members_stay_distinct_from_absent_ones() {
        let props = serde_json::json!({"mag": null});
        let quake = EarthquakeProperties::from_properties(&props);
        assert_eq!(quake.mag, Some(Value::Null));
        assert_eq!(quake.place, None);
    }

    #[test]
    fn mistyped_members_are_kept_verbatim() {
        let props = serde_json::json!({"mag": "4.2", "place": 17});
        let quake = EarthquakeProperties::from_properties(&props);
        assert_eq!(quake.mag, Some(serde_json::json!("4.2")));
        assert_eq!(quake.place, Some(serde_json::json!(17)));
    }

    #[test]
    fn non_object_properties_are_empty() {
        let quake = EarthquakeProperties::from_properties(&Value::Null);
        assert_eq!(quake, EarthquakeProperties::default());
    }
}
