//! Pinhole camera intrinsics and the ground footprint they imply.

use crate::PlanError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// Camera intrinsics.
///
/// Missing fields take the defaults (35 mm lens, 36 x 24 mm sensor,
/// 4000 x 3000 px) when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraModel {
    focal_length_mm: f64,
    sensor_width_mm: f64,
    sensor_height_mm: f64,
    image_width_px: u32,
    image_height_px: u32,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            focal_length_mm: 35.0,
            sensor_width_mm: 36.0,
            sensor_height_mm: 24.0,
            image_width_px: 4000,
            image_height_px: 3000,
        }
    }
}

impl CameraModel {
    pub fn new(
        focal_length_mm: f64,
        sensor_width_mm: f64,
        sensor_height_mm: f64,
        image_width_px: u32,
        image_height_px: u32,
    ) -> Result<Self, PlanError> {
        Self {
            focal_length_mm,
            sensor_width_mm,
            sensor_height_mm,
            image_width_px,
            image_height_px,
        }
        .validated()
    }

    /// Reads a camera from the JSON file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let reader = BufReader::new(File::open(path)?);
        let camera: Self = serde_json::from_reader(reader)?;
        camera.validated()
    }

    /// Reads a camera from an already parsed JSON record.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PlanError> {
        let camera: Self = serde_json::from_value(value)?;
        camera.validated()
    }

    /// Like [`CameraModel::from_path`], but falls back to the default
    /// intrinsics on any failure.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::from_path(path).unwrap_or_else(|err| {
            warn!(
                "failed to load camera {}, using defaults: {err}",
                path.display()
            );
            Self::default()
        })
    }

    fn validated(self) -> Result<Self, PlanError> {
        let lengths = [
            ("focal_length_mm", self.focal_length_mm),
            ("sensor_width_mm", self.sensor_width_mm),
            ("sensor_height_mm", self.sensor_height_mm),
        ];
        if let Some((name, value)) = lengths
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(PlanError::Camera(format!("{name} must be positive, got {value}")));
        }
        if self.image_width_px == 0 || self.image_height_px == 0 {
            return Err(PlanError::Camera(format!(
                "image size must be non-zero, got {}x{}",
                self.image_width_px, self.image_height_px
            )));
        }
        Ok(self)
    }

    pub fn focal_length_mm(&self) -> f64 {
        self.focal_length_mm
    }

    pub fn sensor_width_mm(&self) -> f64 {
        self.sensor_width_mm
    }

    pub fn sensor_height_mm(&self) -> f64 {
        self.sensor_height_mm
    }

    pub fn image_width_px(&self) -> u32 {
        self.image_width_px
    }

    pub fn image_height_px(&self) -> u32 {
        self.image_height_px
    }

    /// Returns the (x, y) ground resolution, in meters per pixel, when
    /// flying `altitude_m` above flat ground.
    pub fn ground_resolution_at_altitude(&self, altitude_m: f64) -> (f64, f64) {
        let res_x = altitude_m * self.sensor_width_mm
            / (self.focal_length_mm * f64::from(self.image_width_px));
        let res_y = altitude_m * self.sensor_height_mm
            / (self.focal_length_mm * f64::from(self.image_height_px));
        (res_x, res_y)
    }

    /// Altitude at which the x-axis ground resolution equals `gsd_m`.
    pub fn altitude_for_gsd(&self, gsd_m: f64) -> f64 {
        gsd_m * self.focal_length_mm * f64::from(self.image_width_px) / self.sensor_width_mm
    }

    /// Across-track ground footprint width at `altitude_m`.
    pub fn swath_width_at_altitude(&self, altitude_m: f64) -> f64 {
        self.sensor_width_mm / self.focal_length_mm * altitude_m
    }
}
