//! Inward polygon offsetting.
//!
//! This is an edge-intersection approximation of a straight skeleton
//! inset, not a robust clipping offset. Self-intersecting input and
//! offsets larger than the polygon's inradius produce undefined (but
//! finite) rings.

use crate::math::{dot, intersect_lines, length};
use geo::{coord, Coord};

/// Edges shorter than this keep their original position.
const MIN_EDGE_LEN: f64 = 1e-9;

/// Sine of the turn angle below which a vertex is considered collinear
/// with its neighbours.
const COLLINEAR_SIN: f64 = 1e-6;

/// Vectors shorter than this have no usable direction.
const MIN_DIRECTION_LEN: f64 = 1e-6;

/// Consecutive output vertices closer than this (per axis) are merged.
const DUPLICATE_EPSILON: f64 = 1e-6;

/// Shrinks the closed ring `polygon` by `distance` meters.
///
/// Every edge is shifted along its normal toward the vertex centroid
/// and each new vertex is the intersection of the two shifted edges
/// meeting there. Where those edges are parallel, or the vertex is
/// collinear with its neighbours, the vertex is pushed along its angle
/// bisector instead, and failing that along the normal of its outgoing
/// edge.
///
/// Returns an empty ring when fewer than three distinct vertices
/// remain.
pub fn offset_polygon_inward(polygon: &[Coord<f64>], distance: f64) -> Vec<Coord<f64>> {
    let n = polygon.len();
    if n < 3 {
        return Vec::new();
    }

    let centroid = vertex_centroid(polygon);

    let shifted: Vec<(Coord<f64>, Coord<f64>)> = (0..n)
        .map(|i| {
            let (a, b) = (polygon[i], polygon[(i + 1) % n]);
            match inward_normal(a, b, centroid) {
                Some(normal) => (a + normal * distance, b + normal * distance),
                None => (a, b),
            }
        })
        .collect();

    let mut ring: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let prev = polygon[(i + n - 1) % n];
            let cur = polygon[i];
            let next = polygon[(i + 1) % n];
            let (l1_a, l1_b) = shifted[(i + n - 1) % n];
            let (l2_a, l2_b) = shifted[i];
            if is_collinear(prev, cur, next) {
                bisector_vertex(prev, cur, next, centroid, distance)
            } else {
                intersect_lines(l1_a, l1_b, l2_a, l2_b)
                    .unwrap_or_else(|| bisector_vertex(prev, cur, next, centroid, distance))
            }
        })
        .collect();

    ring.dedup_by(|b, a| {
        (a.x - b.x).abs() <= DUPLICATE_EPSILON && (a.y - b.y).abs() <= DUPLICATE_EPSILON
    });

    if ring.len() >= 3 {
        ring
    } else {
        Vec::new()
    }
}

fn vertex_centroid(polygon: &[Coord<f64>]) -> Coord<f64> {
    #[allow(clippy::cast_precision_loss)]
    let n = polygon.len() as f64;
    let sum = polygon
        .iter()
        .fold(coord! { x: 0.0, y: 0.0 }, |sum, xy| sum + *xy);
    sum / n
}

/// Unit normal of edge `a`-`b` pointing toward `centroid`.
fn inward_normal(a: Coord<f64>, b: Coord<f64>, centroid: Coord<f64>) -> Option<Coord<f64>> {
    let edge = b - a;
    let len = length(edge);
    if len <= MIN_EDGE_LEN {
        return None;
    }
    let normal = coord! { x: -edge.y / len, y: edge.x / len };
    let mid = (a + b) / 2.0;
    if dot(centroid - mid, normal) > 0.0 {
        Some(normal)
    } else {
        Some(-normal)
    }
}

fn is_collinear(prev: Coord<f64>, cur: Coord<f64>, next: Coord<f64>) -> bool {
    let (incoming, outgoing) = (cur - prev, next - cur);
    let (len_in, len_out) = (length(incoming), length(outgoing));
    if len_in <= MIN_EDGE_LEN || len_out <= MIN_EDGE_LEN {
        return true;
    }
    let sin = (incoming.x * outgoing.y - incoming.y * outgoing.x) / (len_in * len_out);
    sin.abs() < COLLINEAR_SIN
}

fn bisector_vertex(
    prev: Coord<f64>,
    cur: Coord<f64>,
    next: Coord<f64>,
    centroid: Coord<f64>,
    distance: f64,
) -> Coord<f64> {
    let (to_prev, to_next) = (prev - cur, next - cur);
    let (len_prev, len_next) = (length(to_prev), length(to_next));
    if len_prev < MIN_DIRECTION_LEN || len_next < MIN_DIRECTION_LEN {
        return cur;
    }
    let (u_prev, u_next) = (to_prev / len_prev, to_next / len_next);
    let bisector = u_prev + u_next;
    let len_bisector = length(bisector);
    if len_bisector < MIN_DIRECTION_LEN {
        // Straight through; shift along the outgoing edge's normal.
        return inward_normal(cur, next, centroid).map_or(cur, |normal| cur + normal * distance);
    }
    let bisector = bisector / len_bisector;
    let cos_half = dot(u_prev, bisector);
    cur + bisector * (distance / cos_half.max(MIN_DIRECTION_LEN))
}
