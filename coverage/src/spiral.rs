//! Concentric ring coverage of a polygon, stitched into one path.

use crate::{
    altitude::{footprint_spacing, ring_spacing, FlightAltitude, DEFAULT_ALTITUDE_M},
    math::{bounding_box_area, distance},
    offset::offset_polygon_inward,
    projection::LocalFrame,
    types::mean_altitude,
    CameraModel, GeodeticPoint, PlanError, Planner, Waypoint,
};
use geo::Coord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Upper bound on generated rings.
const MAX_RINGS: usize = 300;

/// Points kept per ring.
const KEY_POINTS: usize = 5;

/// A ring whose last vertex is this close (per axis) to its first is
/// treated as explicitly closed.
const CLOSED_RING_EPSILON: f64 = 1e-6;

/// Order in which the rings are flown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpiralDirection {
    /// Outer boundary first, then toward the middle.
    #[default]
    Inward,

    /// Innermost ring first, then toward the boundary.
    Outward,
}

impl FromStr for SpiralDirection {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inward" | "contraction" => Ok(Self::Inward),
            "outward" | "expansion" => Ok(Self::Outward),
            _ => Err(PlanError::Direction(s.to_owned())),
        }
    }
}

impl TryFrom<String> for SpiralDirection {
    type Error = PlanError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SpiralDirection> for String {
    fn from(direction: SpiralDirection) -> Self {
        direction.to_string()
    }
}

impl fmt::Display for SpiralDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inward => write!(f, "inward"),
            Self::Outward => write!(f, "outward"),
        }
    }
}

/// Spiral survey parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralParams {
    /// Survey boundary, implicitly closed (required, at least 3).
    polygon: Vec<GeodeticPoint>,

    /// Target ground sampling distance (meters per pixel, defaults to
    /// 0.05).
    gsd_m: Option<f64>,

    /// Overlap between neighbouring rings (percent, defaults to 70).
    side_overlap: f64,

    /// Along-track image overlap (percent, defaults to 70).
    front_overlap: f64,

    #[serde(alias = "spiral_type")]
    spiral_direction: SpiralDirection,

    altitude_m: Option<f64>,

    default_altitude_m: f64,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            polygon: Vec::new(),
            gsd_m: Some(0.05),
            side_overlap: 70.0,
            front_overlap: 70.0,
            spiral_direction: SpiralDirection::Inward,
            altitude_m: None,
            default_altitude_m: DEFAULT_ALTITUDE_M,
        }
    }
}

impl SpiralParams {
    pub fn new(polygon: Vec<GeodeticPoint>) -> Self {
        Self {
            polygon,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn gsd(mut self, meters: f64) -> Self {
        self.gsd_m = Some(meters);
        self
    }

    #[must_use]
    pub fn side_overlap(mut self, percent: f64) -> Self {
        self.side_overlap = percent;
        self
    }

    #[must_use]
    pub fn front_overlap(mut self, percent: f64) -> Self {
        self.front_overlap = percent;
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: SpiralDirection) -> Self {
        self.spiral_direction = direction;
        self
    }

    #[must_use]
    pub fn altitude(mut self, meters: f64) -> Self {
        self.altitude_m = Some(meters);
        self
    }

    #[must_use]
    pub fn default_altitude(mut self, meters: f64) -> Self {
        self.default_altitude_m = meters;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        match self.polygon.len() {
            0 => Err(PlanError::Missing("polygon")),
            found @ 1..=2 => Err(PlanError::TooFewVertices {
                field: "polygon",
                required: 3,
                found,
            }),
            _ => Ok(()),
        }
    }
}

impl Planner for SpiralParams {
    fn try_plan(&self, camera: &CameraModel) -> Result<Vec<Waypoint>, PlanError> {
        self.validate()?;

        let frame = LocalFrame::from_point(&self.polygon[0]);
        let polygon = frame.project(&self.polygon);
        let ground_alt_m = mean_altitude(&self.polygon, |alt| alt != 0.0);

        let flight =
            FlightAltitude::resolve(self.altitude_m, self.gsd_m, self.default_altitude_m, camera);
        let spacing = ring_spacing(flight.swath_width(camera), self.side_overlap / 100.0);
        if !(spacing > 0.0) {
            return Err(PlanError::Degenerate("ring spacing is not positive"));
        }
        let along_spacing =
            footprint_spacing(flight.image_ground_height(camera), self.front_overlap / 100.0);

        let mut rings = concentric_rings(&polygon, spacing);
        if rings.is_empty() {
            return Err(PlanError::Degenerate("no rings generated"));
        }
        if self.spiral_direction == SpiralDirection::Outward {
            rings.reverse();
        }
        let path = stitch(&rings, spacing, along_spacing);

        debug!(
            "spiral; altitude: {:.2}, ring_spacing: {:.2}, along_spacing: {:.2}, rings: {}, waypoints: {}",
            flight.altitude_m,
            spacing,
            along_spacing,
            rings.len(),
            path.len()
        );

        let altitude = ground_alt_m + flight.altitude_m;
        Ok(path
            .into_iter()
            .map(|xy| frame.waypoint(xy, altitude))
            .collect())
    }
}

/// Offsets `polygon` inward by `spacing` over and over, outermost ring
/// first.
///
/// A ring is kept while its bounding box covers at least
/// `max(1, spacing²)`. Generation stops when the offset collapses or
/// stops shrinking.
fn concentric_rings(polygon: &[Coord<f64>], spacing: f64) -> Vec<Vec<Coord<f64>>> {
    let min_area = (spacing * spacing).max(1.0);

    let mut rings = Vec::new();
    let mut current = polygon.to_vec();
    let mut area = bounding_box_area(&current);
    while rings.len() < MAX_RINGS && area >= min_area {
        let next = offset_polygon_inward(&current, spacing);
        rings.push(current);
        if next.len() < 3 {
            break;
        }
        let next_area = bounding_box_area(&next);
        if next_area >= area {
            break;
        }
        current = next;
        area = next_area;
    }
    rings
}

/// Joins the rings into one path.
///
/// Each ring is reduced to its key points and rotated to start at the
/// point nearest the end of the path so far. Every other ring is flown
/// backwards from that start. A ring whose ends are more than half a
/// ring spacing apart gets one extra point leading from its start back
/// toward its end.
fn stitch(rings: &[Vec<Coord<f64>>], spacing: f64, along_spacing: f64) -> Vec<Coord<f64>> {
    let mut path: Vec<Coord<f64>> = Vec::new();
    for (idx, ring) in rings.iter().enumerate() {
        let mut points = key_points(ring);
        if points.is_empty() {
            continue;
        }

        if let Some(last) = path.last() {
            let nearest = points
                .iter()
                .enumerate()
                .map(|(i, xy)| (i, distance(*xy, *last)))
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .map_or(0, |(i, _)| i);
            points.rotate_left(nearest);
        }
        if idx % 2 == 1 && points.len() > 1 {
            points[1..].reverse();
        }

        let (first, last) = (points[0], points[points.len() - 1]);
        let gap = distance(first, last);
        if gap > spacing * 0.5 {
            let closing = if along_spacing < gap {
                first + (last - first) * (along_spacing / gap)
            } else {
                (first + last) / 2.0
            };
            points.push(closing);
        }

        path.extend(points);
    }
    path
}

/// The first vertex, the vertices at 1/5, 2/5 and 3/5 of the way round,
/// and the last vertex. Rings with fewer than five vertices are kept
/// whole.
fn key_points(ring: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let ring = match (ring.first(), ring.last()) {
        (Some(first), Some(last))
            if ring.len() > 1
                && (first.x - last.x).abs() < CLOSED_RING_EPSILON
                && (first.y - last.y).abs() < CLOSED_RING_EPSILON =>
        {
            &ring[..ring.len() - 1]
        }
        _ => ring,
    };

    let n = ring.len();
    if n < KEY_POINTS {
        return ring.to_vec();
    }
    [0, n / 5, 2 * n / 5, 3 * n / 5, n - 1]
        .iter()
        .map(|&i| ring[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{concentric_rings, key_points, stitch, SpiralDirection, SpiralParams};
    use crate::{projection::LocalFrame, CameraModel, GeodeticPoint, PlanError, Planner};
    use approx::assert_abs_diff_eq;
    use geo::{coord, Coord};

    fn square(side: f64) -> Vec<Coord<f64>> {
        vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: side, y: 0.0 },
            coord! { x: side, y: side },
            coord! { x: 0.0, y: side },
        ]
    }

    fn geodetic(frame: &LocalFrame, polygon: &[Coord<f64>]) -> Vec<GeodeticPoint> {
        polygon
            .iter()
            .map(|xy| {
                let (lat, lon) = frame.to_geodetic(*xy);
                GeodeticPoint::new(lat, lon)
            })
            .collect()
    }

    #[test]
    fn test_direction_names() {
        assert_eq!("inward".parse::<SpiralDirection>().unwrap(), SpiralDirection::Inward);
        assert_eq!("Contraction".parse::<SpiralDirection>().unwrap(), SpiralDirection::Inward);
        assert_eq!("OUTWARD".parse::<SpiralDirection>().unwrap(), SpiralDirection::Outward);
        assert_eq!("expansion".parse::<SpiralDirection>().unwrap(), SpiralDirection::Outward);
        assert!(matches!(
            "sideways".parse::<SpiralDirection>(),
            Err(PlanError::Direction(_))
        ));

        let params: SpiralParams = serde_json::from_str(
            r#"{"polygon": [], "spiral_type": "expansion", "altitude_m": 50.0}"#,
        )
        .unwrap();
        assert_eq!(params.spiral_direction, SpiralDirection::Outward);
        assert_eq!(params.gsd_m, Some(0.05));
        assert!(serde_json::from_str::<SpiralParams>(r#"{"spiral_direction": "up"}"#).is_err());
        assert_eq!(
            serde_json::to_string(&SpiralDirection::Outward).unwrap(),
            r#""outward""#
        );
    }

    #[test]
    fn test_concentric_square_rings() {
        let rings = concentric_rings(&square(100.0), 10.0);
        // 100, 80, 60, 40, 20 wide; the 0 wide offset collapses.
        assert_eq!(rings.len(), 5);
        assert_abs_diff_eq!(rings[1][0].x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rings[4][0].x, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rings[4][2].y, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_small_polygon_has_no_rings() {
        assert!(concentric_rings(&square(9.0), 10.0).is_empty());
        assert_eq!(concentric_rings(&square(10.0), 10.0).len(), 1);
    }

    #[test]
    fn test_ring_count_grows_with_area() {
        let counts: Vec<usize> = [20.0, 50.0, 100.0, 200.0, 400.0]
            .iter()
            .map(|side| concentric_rings(&square(*side), 10.0).len())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{counts:?}");
    }

    #[test]
    fn test_key_points() {
        let ring: Vec<Coord<f64>> = (0_u32..10)
            .map(|i| coord! { x: f64::from(i), y: 0.0 })
            .collect();
        let xs: Vec<f64> = key_points(&ring).iter().map(|xy| xy.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 9.0]);

        let mut closed = square(10.0);
        closed.push(closed[0]);
        assert_eq!(key_points(&closed), square(10.0));
    }

    #[test]
    fn test_stitch_starts_near_previous_end() {
        let outer = square(100.0);
        let inner: Vec<Coord<f64>> = square(60.0)
            .iter()
            .map(|xy| *xy + coord! { x: 20.0, y: 20.0 })
            .collect();
        // Large along spacing so the closing point sits midway.
        let path = stitch(&[outer, inner], 20.0, 1000.0);

        // Outer ring: its four corners then the midpoint of first/last.
        assert_eq!(path.len(), 10);
        assert_eq!(path[3], coord! { x: 0.0, y: 100.0 });
        assert_eq!(path[4], coord! { x: 0.0, y: 50.0 });

        // The inner ring starts at its corner nearest (0, 50) and is
        // flown the other way round.
        assert_eq!(path[5], coord! { x: 20.0, y: 20.0 });
        assert_eq!(path[6], coord! { x: 20.0, y: 80.0 });
        assert_eq!(path[7], coord! { x: 80.0, y: 80.0 });
        assert_eq!(path[8], coord! { x: 80.0, y: 20.0 });
        assert_eq!(path[9], coord! { x: 50.0, y: 20.0 });
    }

    #[test]
    fn test_closing_point_at_along_spacing() {
        let path = stitch(&[square(100.0)], 20.0, 30.0);
        assert_eq!(path.len(), 5);
        assert_abs_diff_eq!(path[4].x, 0.0);
        assert_abs_diff_eq!(path[4].y, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plan_inward_and_outward() {
        // 35 mm on a 35 mm sensor: swath equals altitude.
        let camera = CameraModel::new(35.0, 35.0, 24.0, 4000, 3000).unwrap();
        let frame = LocalFrame::new(52.0, 5.0);
        let mut polygon = geodetic(&frame, &square(200.0));
        for vertex in &mut polygon {
            vertex.altitude = Some(12.0);
        }

        // Ring spacing 100 * (1 - 0.8) = 20 m.
        let inward = SpiralParams::new(polygon.clone())
            .altitude(100.0)
            .side_overlap(80.0);
        let waypoints = inward.plan(&camera);
        assert!(!waypoints.is_empty());
        assert!(waypoints.iter().all(|wp| wp.altitude == 112.0));
        assert_abs_diff_eq!(waypoints[0].latitude, polygon[0].latitude, epsilon = 1e-12);
        assert_abs_diff_eq!(waypoints[0].longitude, polygon[0].longitude, epsilon = 1e-12);

        let outward = inward.clone().direction(SpiralDirection::Outward).plan(&camera);
        assert_eq!(outward.len(), waypoints.len());
        let origin = LocalFrame::from_point(&polygon[0]);
        let first = origin.to_planar(&GeodeticPoint::new(outward[0].latitude, outward[0].longitude));
        // The innermost ring sits well inside the boundary.
        assert!(first.x > 50.0 && first.x < 150.0, "{first:?}");
        assert!(first.y > 50.0 && first.y < 150.0, "{first:?}");

        assert_eq!(inward.plan(&camera), waypoints);
    }

    #[test]
    fn test_no_rings() {
        let camera = CameraModel::default();
        let frame = LocalFrame::new(0.0, 0.0);
        let tiny = SpiralParams::new(geodetic(&frame, &square(2.0))).altitude(100.0);
        assert!(matches!(
            tiny.try_plan(&camera),
            Err(PlanError::Degenerate("no rings generated"))
        ));
        assert!(matches!(
            SpiralParams::default().try_plan(&camera),
            Err(PlanError::Missing("polygon"))
        ));
    }
}
