use anyhow::{bail, Context, Error as AnyError};
use coverage::{
    AreaParams, CameraModel, Planner, PoiParams, SpiralParams, StripParams, Waypoint,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fmt,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Area,
    #[serde(alias = "corridor")]
    Strip,
    #[serde(alias = "orbit")]
    Poi,
    Spiral,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Area => "area",
            Self::Strip => "strip",
            Self::Poi => "poi",
            Self::Spiral => "spiral",
        };
        f.write_str(name)
    }
}

/// A mission request as read from disk.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub kind: Kind,

    /// Parameters of the planner selected by `kind`.
    pub params: Value,

    /// Inline camera intrinsics.
    #[serde(default)]
    pub camera: Option<Value>,

    /// Camera intrinsics file, relative to the request file.
    #[serde(default)]
    pub camera_file: Option<PathBuf>,
}

/// A planned mission.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub kind: Kind,
    pub waypoints_count: usize,
    pub altitude_m: f64,
    pub waypoints: Vec<Waypoint>,
}

impl Request {
    pub fn from_path(path: &Path) -> Result<Self, AnyError> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut request: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        request.camera_file = request.camera_file.map(|file| match path.parent() {
            Some(dir) => dir.join(file),
            None => file,
        });
        Ok(request)
    }

    /// Picks the camera: `cli_camera` if given, else the request's
    /// camera file, else its inline camera, else the defaults. A camera
    /// from the request that fails to load falls back to the defaults.
    pub fn camera(&self, cli_camera: Option<&CameraModel>) -> CameraModel {
        if let Some(camera) = cli_camera {
            return *camera;
        }
        if let Some(file) = &self.camera_file {
            return CameraModel::load_or_default(file);
        }
        match &self.camera {
            Some(value) => CameraModel::from_value(value.clone()).unwrap_or_else(|err| {
                warn!("inline camera rejected, using defaults: {err}");
                CameraModel::default()
            }),
            None => CameraModel::default(),
        }
    }

    pub fn planner(&self) -> Result<Box<dyn Planner>, AnyError> {
        let params = self.params.clone();
        let planner: Box<dyn Planner> = match self.kind {
            Kind::Area => Box::new(serde_json::from_value::<AreaParams>(params)?),
            Kind::Strip => Box::new(serde_json::from_value::<StripParams>(params)?),
            Kind::Poi => Box::new(serde_json::from_value::<PoiParams>(params)?),
            Kind::Spiral => Box::new(serde_json::from_value::<SpiralParams>(params)?),
        };
        Ok(planner)
    }

    pub fn plan(&self, cli_camera: Option<&CameraModel>) -> Result<Plan, AnyError> {
        let camera = self.camera(cli_camera);
        debug!("{} mission, camera: {camera:?}", self.kind);

        let waypoints = self
            .planner()
            .with_context(|| format!("invalid {} parameters", self.kind))?
            .try_plan(&camera)
            .with_context(|| format!("could not plan {} mission", self.kind))?;
        let Some(first) = waypoints.first() else {
            bail!("{} mission produced no waypoints", self.kind);
        };

        Ok(Plan {
            kind: self.kind,
            waypoints_count: waypoints.len(),
            altitude_m: first.altitude,
            waypoints,
        })
    }
}
