//! # Coverage path planning
//!
//! `coverage` turns survey geometry (polygons, corridors and points of
//! interest) into ordered camera waypoints.

mod altitude;
mod area;
mod camera;
mod error;
mod math;
mod offset;
mod poi;
pub mod projection;
mod spiral;
mod strip;
mod types;

pub use {
    crate::{
        altitude::{FlightAltitude, DEFAULT_ALTITUDE_M},
        area::{AreaParams, Density},
        camera::CameraModel,
        error::PlanError,
        offset::offset_polygon_inward,
        poi::PoiParams,
        projection::LocalFrame,
        spiral::{SpiralDirection, SpiralParams},
        strip::StripParams,
        types::{GeodeticPoint, Waypoint},
    },
    geo,
};

use log::warn;

/// A mission that can be flown with a given camera.
pub trait Planner {
    /// Plans the mission, or says why it can't be.
    fn try_plan(&self, camera: &CameraModel) -> Result<Vec<Waypoint>, PlanError>;

    /// Plans the mission. An empty list means it could not be planned;
    /// the reason is logged.
    fn plan(&self, camera: &CameraModel) -> Vec<Waypoint> {
        self.try_plan(camera).unwrap_or_else(|err| {
            warn!("planning failed: {err}");
            Vec::new()
        })
    }
}
