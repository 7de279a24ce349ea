use serde::{Deserialize, Serialize};

/// A geodetic input vertex.
///
/// Accepts both `latitude`/`longitude`/`altitude` and the short
/// `lat`/`lon`/`alt` spellings when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    /// Degrees north.
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Degrees east.
    #[serde(alias = "lon")]
    pub longitude: f64,

    /// Meters. Whether this is ground height or an absolute value is
    /// up to the caller.
    #[serde(default, alias = "alt", skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl GeodeticPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    #[must_use]
    pub fn with_altitude(mut self, meters: f64) -> Self {
        self.altitude = Some(meters);
        self
    }
}

/// One flight waypoint. Position in the output list is the flight
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Mean of the vertex altitudes accepted by `keep`, or 0 when none are.
pub(crate) fn mean_altitude<F>(points: &[GeodeticPoint], keep: F) -> f64
where
    F: Fn(f64) -> bool,
{
    let (sum, count) = points
        .iter()
        .filter_map(|point| point.altitude)
        .filter(|alt| keep(*alt))
        .fold((0.0, 0_u32), |(sum, count), alt| (sum + alt, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}
