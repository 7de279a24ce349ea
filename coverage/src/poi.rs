//! Orbits around a point of interest.

use crate::{
    altitude::{footprint_spacing, ring_spacing, FlightAltitude, DEFAULT_ALTITUDE_M},
    projection::LocalFrame,
    CameraModel, GeodeticPoint, PlanError, Planner, Waypoint,
};
use geo::{coord, Coord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const MIN_RING_STEPS: f64 = 6.0;
const MAX_RING_STEPS: f64 = 12.0;

/// Slack on the outermost ring so `radius` itself is kept when it is an
/// exact multiple of the ring spacing.
const RADIUS_TOLERANCE_M: f64 = 1e-6;

/// Upper bound on concentric orbits.
const MAX_ORBITS: u32 = 1_000;

/// Point of interest orbit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiParams {
    /// Orbit center (required). Its altitude, if any, is the ground
    /// reference for the flight altitude.
    poi: Option<GeodeticPoint>,

    /// Outermost orbit radius (meters, required, positive).
    radius: Option<f64>,

    /// Along-track image overlap (percent, defaults to 70).
    front_overlap: f64,

    /// Overlap between neighbouring orbits (percent, defaults to 70).
    side_overlap: f64,

    altitude_m: Option<f64>,

    gsd_m: Option<f64>,

    default_altitude_m: f64,
}

impl Default for PoiParams {
    fn default() -> Self {
        Self {
            poi: None,
            radius: None,
            front_overlap: 70.0,
            side_overlap: 70.0,
            altitude_m: None,
            gsd_m: None,
            default_altitude_m: DEFAULT_ALTITUDE_M,
        }
    }
}

impl PoiParams {
    pub fn new(poi: GeodeticPoint, radius: f64) -> Self {
        Self {
            poi: Some(poi),
            radius: Some(radius),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn front_overlap(mut self, percent: f64) -> Self {
        self.front_overlap = percent;
        self
    }

    #[must_use]
    pub fn side_overlap(mut self, percent: f64) -> Self {
        self.side_overlap = percent;
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
        self.center()?;
        self.max_radius().map(|_| ())
    }

    fn center(&self) -> Result<&GeodeticPoint, PlanError> {
        self.poi.as_ref().ok_or(PlanError::Missing("poi"))
    }

    fn max_radius(&self) -> Result<f64, PlanError> {
        match self.radius {
            None => Err(PlanError::Missing("radius")),
            Some(radius) if radius > 0.0 => Ok(radius),
            Some(radius) => Err(PlanError::InvalidRadius(radius)),
        }
    }
}

impl Planner for PoiParams {
    fn try_plan(&self, camera: &CameraModel) -> Result<Vec<Waypoint>, PlanError> {
        let center = self.center()?;
        let max_radius = self.max_radius()?;

        let flight =
            FlightAltitude::resolve(self.altitude_m, self.gsd_m, self.default_altitude_m, camera);
        let swath = flight.swath_width(camera);
        let front = self.front_overlap / 100.0;
        let lateral_step = ring_spacing(swath, self.side_overlap / 100.0);
        let along_track = swath * (1.0 - front);
        // Reported only; orbit steps are sized from `along_track`.
        let along_spacing = {
            let spacing = flight.image_ground_height(camera) * (1.0 - front);
            if spacing > 0.0 {
                spacing
            } else {
                flight.gsd_m * 5.0
            }
        };

        let radii = ring_radii(lateral_step, max_radius)?;
        let altitude = center.altitude.unwrap_or(0.0) + flight.altitude_m;

        debug!(
            "poi; altitude: {:.2}, swath: {:.2}, lateral_step: {:.2}, along_spacing: {:.2}, rings: {}",
            flight.altitude_m,
            swath,
            lateral_step,
            along_spacing,
            radii.len()
        );

        // Rings are independent orbits, flown smallest first.
        let frame = LocalFrame::from_point(center);
        Ok(radii
            .into_iter()
            .flat_map(|radius| orbit(radius, along_track))
            .map(|xy| frame.waypoint(xy, altitude))
            .collect())
    }
}

/// Radii `step, 2 * step, ...` up to `max_radius`, or only `max_radius`
/// when not even one step fits. Fails beyond [`MAX_ORBITS`] radii.
fn ring_radii(step: f64, max_radius: f64) -> Result<Vec<f64>, PlanError> {
    if !(step > 0.0) || max_radius < step {
        return Ok(vec![max_radius]);
    }
    if max_radius / step > f64::from(MAX_ORBITS) {
        return Err(PlanError::Degenerate("too many orbits"));
    }
    Ok((1..=MAX_ORBITS)
        .map(|k| f64::from(k) * step)
        .take_while(|radius| *radius <= max_radius + RADIUS_TOLERANCE_M)
        .collect())
}

/// Evenly spaced points on a circle of `radius` around the origin,
/// counter-clockwise from east.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn orbit(radius: f64, along_track: f64) -> Vec<Coord<f64>> {
    let steps = if along_track > 0.0 {
        (TAU * radius / along_track)
            .ceil()
            .clamp(MIN_RING_STEPS, MAX_RING_STEPS) as u32
    } else {
        MAX_RING_STEPS as u32
    };
    (0..steps)
        .map(|step| {
            let theta = TAU * f64::from(step) / f64::from(steps);
            coord! { x: radius * theta.cos(), y: radius * theta.sin() }
        })
        .collect()
}
