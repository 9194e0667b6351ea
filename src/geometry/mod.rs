//! Geometry kernel: stateless intersection tests used by area erasing.

pub mod hit_testing;

pub use hit_testing::{
    element_intersects_rect, point_in_rect, query_rect, rects_overlap, segments_intersect,
};
