//! Boustrophedon (lawnmower) coverage of a polygon.

use crate::{
    altitude::{footprint_spacing, FlightAltitude, DEFAULT_ALTITUDE_M},
    math::{rotate, scanline_crossings},
    projection::LocalFrame,
    types::mean_altitude,
    CameraModel, GeodeticPoint, PlanError, Planner, Waypoint,
};
use geo::{coord, Coord};
use log::debug;
use serde::{Deserialize, Serialize};

/// Slack added to the last scan line so a line landing on the top
/// vertex is not lost to rounding.
const SCAN_END_TOLERANCE: f64 = 1e-6;

/// Upper bound on scan lines across one polygon.
const MAX_SCAN_LINES: f64 = 100_000.0;

/// How many waypoints each flight line gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// Only the two ends of each segment.
    #[default]
    Endpoints,

    /// Segments resampled at the front-overlap spacing.
    Sampled,
}

/// Area survey parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaParams {
    /// Survey boundary, implicitly closed (required, at least 3).
    polygon: Vec<GeodeticPoint>,

    /// Along-track image overlap (percent, defaults to 70).
    front_overlap: f64,

    /// Across-track image overlap (percent, defaults to 60).
    side_overlap: f64,

    /// Flight line direction (degrees counter-clockwise from east,
    /// defaults to 0).
    heading: f64,

    altitude_m: Option<f64>,

    gsd_m: Option<f64>,

    default_altitude_m: f64,

    density: Density,
}

impl Default for AreaParams {
    fn default() -> Self {
        Self {
            polygon: Vec::new(),
            front_overlap: 70.0,
            side_overlap: 60.0,
            heading: 0.0,
            altitude_m: None,
            gsd_m: None,
            default_altitude_m: DEFAULT_ALTITUDE_M,
            density: Density::Endpoints,
        }
    }
}

impl AreaParams {
    pub fn new(polygon: Vec<GeodeticPoint>) -> Self {
        Self {
            polygon,
            ..Self::default()
        }
    }

    /// Along-track image overlap (percent, defaults to 70).
    #[must_use]
    pub fn front_overlap(mut self, percent: f64) -> Self {
        self.front_overlap = percent;
        self
    }

    /// Across-track image overlap (percent, defaults to 60).
    #[must_use]
    pub fn side_overlap(mut self, percent: f64) -> Self {
        self.side_overlap = percent;
        self
    }

    /// Flight line direction (degrees, defaults to 0).
    #[must_use]
    pub fn heading(mut self, degrees: f64) -> Self {
        self.heading = degrees;
        self
    }

    /// Flight altitude (meters). Takes precedence over GSD.
    #[must_use]
    pub fn altitude(mut self, meters: f64) -> Self {
        self.altitude_m = Some(meters);
        self
    }

    /// Target ground sampling distance (meters per pixel).
    #[must_use]
    pub fn gsd(mut self, meters: f64) -> Self {
        self.gsd_m = Some(meters);
        self
    }

    /// Altitude flown when neither altitude nor GSD is given (meters,
    /// defaults to 120).
    #[must_use]
    pub fn default_altitude(mut self, meters: f64) -> Self {
        self.default_altitude_m = meters;
        self
    }

    #[must_use]
    pub fn density(mut self, density: Density) -> Self {
        self.density = density;
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

impl Planner for AreaParams {
    fn try_plan(&self, camera: &CameraModel) -> Result<Vec<Waypoint>, PlanError> {
        self.validate()?;

        let frame = LocalFrame::from_point(&self.polygon[0]);
        let polygon = frame.project(&self.polygon);
        let ground_alt_m = mean_altitude(&self.polygon, |alt| alt != 0.0);

        let flight =
            FlightAltitude::resolve(self.altitude_m, self.gsd_m, self.default_altitude_m, camera);
        let strip_spacing =
            footprint_spacing(flight.image_ground_width(camera), self.side_overlap / 100.0);
        if !(strip_spacing > 0.0) {
            return Err(PlanError::Degenerate("strip spacing is not positive"));
        }

        let heading_rad = self.heading.to_radians();
        let rotated: Vec<Coord<f64>> = polygon.iter().map(|xy| rotate(*xy, -heading_rad)).collect();
        let segments = scan_segments(&rotated, strip_spacing)?;

        let (path, altitude) = match self.density {
            Density::Endpoints => (endpoint_path(&segments), flight.altitude_m + ground_alt_m),
            Density::Sampled => {
                let along_spacing = footprint_spacing(
                    flight.image_ground_height(camera),
                    self.front_overlap / 100.0,
                );
                (
                    sampled_path(&segments, strip_spacing, along_spacing),
                    flight.altitude_m,
                )
            }
        };

        debug!(
            "area; altitude: {:.2}, gsd: {:.4}, strip_spacing: {:.2}, segments: {}, waypoints: {}",
            flight.altitude_m,
            flight.gsd_m,
            strip_spacing,
            segments.len(),
            path.len()
        );

        Ok(path
            .into_iter()
            .map(|xy| frame.waypoint(rotate(xy, heading_rad), altitude))
            .collect())
    }
}

/// Cuts `polygon` with horizontal lines `spacing` apart, starting at its
/// lowest y, and returns each inside segment as (left, right).
///
/// Fails when more than [`MAX_SCAN_LINES`] lines would be needed.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scan_segments(
    polygon: &[Coord<f64>],
    spacing: f64,
) -> Result<Vec<(Coord<f64>, Coord<f64>)>, PlanError> {
    let (min_y, max_y) = polygon
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), xy| {
            (lo.min(xy.y), hi.max(xy.y))
        });

    let extra_lines = ((max_y - min_y + SCAN_END_TOLERANCE) / spacing).floor();
    if !(extra_lines < MAX_SCAN_LINES) {
        return Err(PlanError::Degenerate("too many scan lines"));
    }

    let mut segments = Vec::new();
    for line in 0..=extra_lines as u32 {
        let y = min_y + f64::from(line) * spacing;
        // An odd crossing count means the line grazed a vertex; the
        // unpaired crossing is dropped.
        segments.extend(
            scanline_crossings(polygon, y)
                .chunks_exact(2)
                .map(|pair| (coord! { x: pair[0], y: y }, coord! { x: pair[1], y: y })),
        );
    }
    Ok(segments)
}

/// Two waypoints per segment, every other segment flown right to left.
fn endpoint_path(segments: &[(Coord<f64>, Coord<f64>)]) -> Vec<Coord<f64>> {
    segments
        .iter()
        .enumerate()
        .flat_map(|(idx, &(left, right))| {
            if idx % 2 == 1 {
                [right, left]
            } else {
                [left, right]
            }
        })
        .collect()
}

/// Samples every segment at `along_spacing`, regroups the samples by
/// scan line and snakes through the lines.
fn sampled_path(
    segments: &[(Coord<f64>, Coord<f64>)],
    strip_spacing: f64,
    along_spacing: f64,
) -> Vec<Coord<f64>> {
    let tolerance = strip_spacing * 0.001 + 0.0001;

    let mut lines: Vec<(f64, Vec<Coord<f64>>)> = Vec::new();
    for sample in segments
        .iter()
        .flat_map(|&(left, right)| sample_segment(left, right, along_spacing))
    {
        let nearest = lines
            .iter()
            .enumerate()
            .map(|(idx, (line_y, _))| (idx, (line_y - sample.y).abs()))
            .min_by(|(_, a), (_, b)| a.total_cmp(b));
        match nearest {
            Some((idx, offset)) if offset <= tolerance => lines[idx].1.push(sample),
            _ => lines.push((sample.y, vec![sample])),
        }
    }

    lines.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    lines
        .into_iter()
        .enumerate()
        .flat_map(|(idx, (_, mut samples))| {
            samples.sort_by(|a, b| a.x.total_cmp(&b.x));
            if idx % 2 == 1 {
                samples.reverse();
            }
            samples
        })
        .collect()
}

/// Evenly spaced points from `start` to `end` inclusive, no further
/// apart than `spacing`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sample_segment(start: Coord<f64>, end: Coord<f64>, spacing: f64) -> Vec<Coord<f64>> {
    let length = end.x - start.x;
    let steps = (length / spacing).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|step| start + (end - start) * (step as f64 / steps as f64))
        .collect()
}
