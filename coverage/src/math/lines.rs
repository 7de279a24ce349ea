use geo::{coord, Coord};

/// Denominators at or below this are treated as parallel lines.
const PARALLEL_EPSILON: f64 = 1e-12;

pub fn dot(a: Coord<f64>, b: Coord<f64>) -> f64 {
    a.x * b.x + a.y * b.y
}

pub fn length(v: Coord<f64>) -> f64 {
    v.x.hypot(v.y)
}

pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    length(b - a)
}

/// Intersection of the infinite lines through `p1`-`p2` and `p3`-`p4`,
/// or `None` if they are parallel.
pub fn intersect_lines(
    p1: Coord<f64>,
    p2: Coord<f64>,
    p3: Coord<f64>,
    p4: Coord<f64>,
) -> Option<Coord<f64>> {
    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denom.abs() <= PARALLEL_EPSILON {
        return None;
    }
    let a = p1.x * p2.y - p1.y * p2.x;
    let b = p3.x * p4.y - p3.y * p4.x;
    Some(coord! {
        x: (a * (p3.x - p4.x) - (p1.x - p2.x) * b) / denom,
        y: (a * (p3.y - p4.y) - (p1.y - p2.y) * b) / denom,
    })
}
