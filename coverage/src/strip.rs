//! Corridor planning: keep only the polyline vertices where the path
//! actually turns.

use crate::{
    altitude::{FlightAltitude, DEFAULT_ALTITUDE_M},
    projection::LocalFrame,
    types::mean_altitude,
    CameraModel, GeodeticPoint, PlanError, Planner, Waypoint,
};
use geo::Coord;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, iter};

/// Output waypoints closer than this in both latitude and longitude
/// (degrees) are merged.
const DUPLICATE_DEG: f64 = 1e-7;

/// Corridor survey parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripParams {
    /// Corridor centerline (required, at least 2).
    polyline: Vec<GeodeticPoint>,

    /// Along-track image overlap (percent, defaults to 70). Waypoints
    /// are placed on turns, so this does not affect spacing.
    front_overlap: f64,

    /// Smallest heading change kept as a waypoint (degrees, defaults
    /// to 5).
    turn_threshold_deg: f64,

    altitude_m: Option<f64>,

    gsd_m: Option<f64>,

    default_altitude_m: f64,
}

impl Default for StripParams {
    fn default() -> Self {
        Self {
            polyline: Vec::new(),
            front_overlap: 70.0,
            turn_threshold_deg: 5.0,
            altitude_m: None,
            gsd_m: None,
            default_altitude_m: DEFAULT_ALTITUDE_M,
        }
    }
}

impl StripParams {
    pub fn new(polyline: Vec<GeodeticPoint>) -> Self {
        Self {
            polyline,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn front_overlap(mut self, percent: f64) -> Self {
        self.front_overlap = percent;
        self
    }

    /// Smallest heading change kept as a waypoint (degrees, defaults
    /// to 5).
    #[must_use]
    pub fn turn_threshold(mut self, degrees: f64) -> Self {
        self.turn_threshold_deg = degrees;
        self
    }

    #[must_use]
    pub fn altitude(mut self, meters: f64) -> Self {
        self.altitude_m = Some(meters);
        self
    }

    #[must_use]
    pub fn gsd(mut self, meters: f64) -> Self {
        self.gsd_m = Some(meters);
        self
    }

    #[must_use]
    pub fn default_altitude(mut self, meters: f64) -> Self {
        self.default_altitude_m = meters;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        match self.polyline.len() {
            0 => Err(PlanError::Missing("polyline")),
            1 => Err(PlanError::TooFewVertices {
                field: "polyline",
                required: 2,
                found: 1,
            }),
            _ => Ok(()),
        }
    }
}

impl Planner for StripParams {
    fn try_plan(&self, camera: &CameraModel) -> Result<Vec<Waypoint>, PlanError> {
        self.validate()?;

        let frame = LocalFrame::from_point(&self.polyline[0]);
        let polyline = frame.project(&self.polyline);
        let ground_alt_m = mean_altitude(&self.polyline, |_| true);

        let flight =
            FlightAltitude::resolve(self.altitude_m, self.gsd_m, self.default_altitude_m, camera);
        let altitude = flight.altitude_m + ground_alt_m;
        let threshold_rad = self.turn_threshold_deg.to_radians();

        // The ends are always flown.
        let keep = iter::once(true)
            .chain(
                polyline
                    .iter()
                    .tuple_windows()
                    .map(|(a, b, c)| turn_angle(*a, *b, *c) > threshold_rad),
            )
            .chain(iter::once(true));

        let mut waypoints: Vec<Waypoint> = keep
            .zip(&self.polyline)
            .filter(|(keep, _)| *keep)
            .map(|(_, vertex)| Waypoint {
                latitude: vertex.latitude,
                longitude: vertex.longitude,
                altitude,
            })
            .collect();
        waypoints.dedup_by(|b, a| {
            (a.latitude - b.latitude).abs() < DUPLICATE_DEG
                && (a.longitude - b.longitude).abs() < DUPLICATE_DEG
        });

        debug!(
            "strip; altitude: {:.2}, vertices: {}, waypoints: {}",
            flight.altitude_m,
            self.polyline.len(),
            waypoints.len()
        );

        Ok(waypoints)
    }
}

/// Absolute heading change at `b` when flying `a` -> `b` -> `c`, in
/// `[0, π]`.
fn turn_angle(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    let incoming = (b.y - a.y).atan2(b.x - a.x);
    let outgoing = (c.y - b.y).atan2(c.x - b.x);
    let diff = (outgoing - incoming).abs();
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::{turn_angle, StripParams};
    use crate::{projection::LocalFrame, CameraModel, GeodeticPoint, PlanError, Planner};
    use approx::assert_abs_diff_eq;
    use geo::coord;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn polyline(frame: &LocalFrame, xys: &[(f64, f64)]) -> Vec<GeodeticPoint> {
        xys.iter()
            .map(|&(x, y)| {
                let (lat, lon) = frame.to_geodetic(coord! { x: x, y: y });
                GeodeticPoint::new(lat, lon)
            })
            .collect()
    }

    #[test]
    fn test_turn_angle() {
        let origin = coord! { x: 0.0, y: 0.0 };
        let east = coord! { x: 10.0, y: 0.0 };
        assert_abs_diff_eq!(turn_angle(origin, east, coord! { x: 20.0, y: 0.0 }), 0.0);
        assert_abs_diff_eq!(
            turn_angle(origin, east, coord! { x: 10.0, y: 10.0 }),
            FRAC_PI_2,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(turn_angle(origin, east, origin), PI, epsilon = 1e-12);
        // Crossing the ±π seam is still a small turn.
        let west = coord! { x: -10.0, y: 0.0 };
        let turn = turn_angle(origin, west, coord! { x: -20.0, y: -0.5 });
        assert!(turn < 0.1, "{turn}");
    }

    #[test]
    fn test_straight_line_keeps_ends() {
        let camera = CameraModel::default();
        let frame = LocalFrame::new(51.5, -0.12);
        let line = polyline(
            &frame,
            &[(0.0, 0.0), (25.0, 10.0), (50.0, 20.0), (75.0, 30.0), (100.0, 40.0)],
        );
        let waypoints = StripParams::new(line.clone()).plan(&camera);
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].latitude, line[0].latitude);
        assert_eq!(waypoints[1].longitude, line[4].longitude);
    }

    #[test]
    fn test_right_angle_is_kept() {
        let camera = CameraModel::default();
        let frame = LocalFrame::new(0.0, 0.0);
        let line = polyline(&frame, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        let waypoints = StripParams::new(line).altitude(60.0).plan(&camera);
        assert_eq!(waypoints.len(), 3);
        assert!(waypoints.iter().all(|wp| wp.altitude == 60.0));
    }

    #[test]
    fn test_threshold_filters_gentle_bends() {
        let camera = CameraModel::default();
        let frame = LocalFrame::new(35.0, 139.0);
        // A 3° bend then a 30° bend.
        let bend = 3_f64.to_radians();
        let sharp = 33_f64.to_radians();
        let line = polyline(
            &frame,
            &[
                (0.0, 0.0),
                (100.0, 0.0),
                (100.0 + 100.0 * bend.cos(), 100.0 * bend.sin()),
                (
                    100.0 + 100.0 * bend.cos() + 100.0 * sharp.cos(),
                    100.0 * bend.sin() + 100.0 * sharp.sin(),
                ),
            ],
        );
        assert_eq!(StripParams::new(line.clone()).plan(&camera).len(), 3);
        assert_eq!(
            StripParams::new(line.clone())
                .turn_threshold(1.0)
                .plan(&camera)
                .len(),
            4
        );
        assert_eq!(
            StripParams::new(line).turn_threshold(45.0).plan(&camera).len(),
            2
        );
    }

    #[test]
    fn test_altitude_adds_mean_vertex_altitude() {
        let camera = CameraModel::default();
        let frame = LocalFrame::new(0.0, 0.0);
        let mut line = polyline(&frame, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
        line[0].altitude = Some(0.0);
        line[2].altitude = Some(30.0);
        let waypoints = StripParams::new(line).plan(&camera);
        // Mean of the provided altitudes (0 and 30) on top of 120 m.
        assert!(waypoints.iter().all(|wp| wp.altitude == 135.0));
    }

    #[test]
    fn test_duplicate_end_is_merged() {
        let camera = CameraModel::default();
        let frame = LocalFrame::new(0.0, 0.0);
        let line = polyline(&frame, &[(0.0, 0.0), (50.0, 0.0), (50.0, 0.0)]);
        let waypoints = StripParams::new(line).plan(&camera);
        assert_eq!(waypoints.len(), 2);
    }

    #[test]
    fn test_too_short() {
        let camera = CameraModel::default();
        assert!(matches!(
            StripParams::default().try_plan(&camera),
            Err(PlanError::Missing("polyline"))
        ));
        let single = vec![GeodeticPoint::new(1.0, 2.0)];
        assert!(matches!(
            StripParams::new(single).try_plan(&camera),
            Err(PlanError::TooFewVertices { found: 1, .. })
        ));
    }
}
