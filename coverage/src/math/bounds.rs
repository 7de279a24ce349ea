use geo::{BoundingRect, Coord, LineString};

/// Area of the axis aligned bounding box of `points`, 0 if empty.
pub fn bounding_box_area(points: &[Coord<f64>]) -> f64 {
    LineString::from(points.to_vec())
        .bounding_rect()
        .map_or(0.0, |rect| rect.width() * rect.height())
}
