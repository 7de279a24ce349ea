//! Equirectangular local tangent plane.
//!
//! Good to within a few meters over extents of a few kilometers. The
//! error grows with distance from the origin and with the origin's
//! latitude.

use crate::types::{GeodeticPoint, Waypoint};
use geo::{coord, Coord};

/// WGS84 equatorial radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Returns the planar offset, in meters, of `(lat, lon)` from the
/// origin `(lat0, lon0)`. `x` points east, `y` north.
pub fn to_planar(lat0: f64, lon0: f64, lat: f64, lon: f64) -> Coord<f64> {
    let d_lat = (lat - lat0).to_radians();
    let d_lon = (lon - lon0).to_radians();
    coord! {
        x: d_lon * EARTH_RADIUS_M * lat0.to_radians().cos(),
        y: d_lat * EARTH_RADIUS_M,
    }
}

/// Inverse of [`to_planar`] for the same origin. Returns `(lat, lon)`.
pub fn to_geodetic(lat0: f64, lon0: f64, xy: Coord<f64>) -> (f64, f64) {
    let lat = lat0 + (xy.y / EARTH_RADIUS_M).to_degrees();
    let lon = lon0 + (xy.x / (EARTH_RADIUS_M * lat0.to_radians().cos())).to_degrees();
    (lat, lon)
}

/// A local frame anchored at a fixed origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    lat0: f64,
    lon0: f64,
}

impl LocalFrame {
    pub fn new(lat0: f64, lon0: f64) -> Self {
        Self { lat0, lon0 }
    }

    pub fn from_point(origin: &GeodeticPoint) -> Self {
        Self::new(origin.latitude, origin.longitude)
    }

    pub fn to_planar(&self, point: &GeodeticPoint) -> Coord<f64> {
        to_planar(self.lat0, self.lon0, point.latitude, point.longitude)
    }

    pub fn project(&self, points: &[GeodeticPoint]) -> Vec<Coord<f64>> {
        points.iter().map(|point| self.to_planar(point)).collect()
    }

    pub fn to_geodetic(&self, xy: Coord<f64>) -> (f64, f64) {
        to_geodetic(self.lat0, self.lon0, xy)
    }

    pub(crate) fn waypoint(&self, xy: Coord<f64>, altitude: f64) -> Waypoint {
        let (latitude, longitude) = self.to_geodetic(xy);
        Waypoint {
            latitude,
            longitude,
            altitude,
        }
    }
}
