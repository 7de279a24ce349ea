//! Flight altitude and ground sampling distance resolution shared by
//! every planner.

use crate::CameraModel;

/// Default flight altitude when neither altitude nor GSD is given.
pub const DEFAULT_ALTITUDE_M: f64 = 120.0;

/// Spacing at or below this is treated as degenerate.
const MIN_FOOTPRINT_SPACING_M: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightAltitude {
    /// Flight altitude above the ground reference (meters).
    pub altitude_m: f64,

    /// Ground sampling distance at `altitude_m` (meters per pixel).
    pub gsd_m: f64,
}

impl FlightAltitude {
    /// Resolves altitude and GSD.
    ///
    /// A positive `altitude_m` wins, else a positive `gsd_m` sets the
    /// altitude, else `default_altitude_m` is flown. A GSD that was not
    /// given is the x-axis ground resolution at the resolved altitude.
    pub fn resolve(
        altitude_m: Option<f64>,
        gsd_m: Option<f64>,
        default_altitude_m: f64,
        camera: &CameraModel,
    ) -> Self {
        let gsd_m = gsd_m.filter(|gsd| *gsd > 0.0);
        let altitude_m = match (altitude_m.filter(|alt| *alt > 0.0), gsd_m) {
            (Some(altitude_m), _) => altitude_m,
            (None, Some(gsd_m)) => camera.altitude_for_gsd(gsd_m),
            (None, None) => default_altitude_m,
        };
        let gsd_m = gsd_m.unwrap_or_else(|| camera.ground_resolution_at_altitude(altitude_m).0);
        Self { altitude_m, gsd_m }
    }

    /// Across-track footprint width from the lens geometry, or from the
    /// GSD if the lens geometry gives nothing usable.
    pub fn swath_width(&self, camera: &CameraModel) -> f64 {
        let swath = camera.swath_width_at_altitude(self.altitude_m);
        if swath > 0.0 {
            swath
        } else {
            self.image_ground_width(camera)
        }
    }

    pub fn image_ground_width(&self, camera: &CameraModel) -> f64 {
        self.gsd_m * f64::from(camera.image_width_px())
    }

    pub fn image_ground_height(&self, camera: &CameraModel) -> f64 {
        self.gsd_m * f64::from(camera.image_height_px())
    }
}

/// Distance between consecutive footprints of size `footprint_m` that
/// overlap by the fraction `overlap`.
///
/// Falls back to a fifth of the footprint when the overlap leaves
/// 0.1 m or less.
pub fn footprint_spacing(footprint_m: f64, overlap: f64) -> f64 {
    let spacing = footprint_m * (1.0 - overlap);
    if spacing <= MIN_FOOTPRINT_SPACING_M {
        footprint_m * 0.2
    } else {
        spacing
    }
}

/// Distance between concentric passes of width `swath_m` that overlap
/// by the fraction `overlap`. Falls back to half a swath.
pub fn ring_spacing(swath_m: f64, overlap: f64) -> f64 {
    let spacing = swath_m * (1.0 - overlap);
    if spacing <= 0.0 {
        swath_m * 0.5
    } else {
        spacing
    }
}
