mod bounds;
mod lines;
mod rotate;
mod scanline;

pub(crate) use {
    bounds::bounding_box_area,
    lines::{distance, dot, intersect_lines, length},
    rotate::rotate,
    scanline::scanline_crossings,
};
