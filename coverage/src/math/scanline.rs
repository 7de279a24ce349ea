use geo::Coord;

/// Returns, in ascending order, the x positions where the horizontal
/// line at `y` crosses the edges of the closed ring `polygon`.
///
/// Edges are treated as half open in y so a vertex lying exactly on the
/// line is counted once, and horizontal edges never cross.
pub fn scanline_crossings(polygon: &[Coord<f64>], y: f64) -> Vec<f64> {
    let mut xs: Vec<f64> = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .filter(|(a, b)| (a.y <= y && b.y > y) || (b.y <= y && a.y > y))
        .map(|(a, b)| {
            let t = (y - a.y) / (b.y - a.y);
            a.x + t * (b.x - a.x)
        })
        .collect();
    xs.sort_by(f64::total_cmp);
    xs
}
