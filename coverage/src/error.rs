use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("missing required parameter '{0}'")]
    Missing(&'static str),

    #[error("'{field}' needs at least {required} points, got {found}")]
    TooFewVertices {
        field: &'static str,
        required: usize,
        found: usize,
    },

    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("unknown spiral direction '{0}'")]
    Direction(String),

    #[error("no usable geometry, {0}")]
    Degenerate(&'static str),

    #[error("invalid camera model, {0}")]
    Camera(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
