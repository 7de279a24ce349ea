use geo::{coord, Coord};

/// Rotates `xy` counter-clockwise about the origin.
pub fn rotate(xy: Coord<f64>, angle_rad: f64) -> Coord<f64> {
    let (sin, cos) = angle_rad.sin_cos();
    coord! {
        x: xy.x * cos - xy.y * sin,
        y: xy.x * sin + xy.y * cos,
    }
}

#[cfg(test)]
mod tests {
    use super::rotate;
    use approx::assert_abs_diff_eq;
    use geo::coord;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_quarter_turn() {
        let rotated = rotate(coord! { x: 10.0, y: 0.0 }, FRAC_PI_2);
        assert_abs_diff_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rotated.y, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_is_exact() {
        let xy = coord! { x: 12.345, y: -67.89 };
        assert_eq!(rotate(xy, -0.0), xy);
        assert_eq!(rotate(xy, 0.0), xy);
    }
}
