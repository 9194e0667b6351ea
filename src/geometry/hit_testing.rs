//! Intersection tests between elements and an axis-aligned query rectangle.
//!
//! All comparisons are inclusive and exact: inputs are screen coordinates, not
//! the output of earlier floating point work, so no epsilon is applied.

use egui::{Pos2, Rect, pos2};

use crate::element::{
    CircleGeometry, Element, EllipseGeometry, Geometry, LineGeometry, PenGeometry, RectGeometry,
};

/// Query rectangle from a corner and a possibly negative extent
pub fn query_rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
    Rect::from_two_pos(pos2(x, y), pos2(x + width, y + height))
}

/// Inclusive point containment; `rect` must be normalized
pub fn point_in_rect(point: Pos2, rect: &Rect) -> bool {
    point.x >= rect.min.x && point.x <= rect.max.x && point.y >= rect.min.y && point.y <= rect.max.y
}

/// Inclusive AABB overlap; touching edges count as overlapping
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.max.x < b.min.x || a.min.x > b.max.x || a.max.y < b.min.y || a.min.y > b.max.y)
}

/// Parametric segment/segment test. Parallel segments never intersect,
/// including collinear overlapping ones.
pub fn segments_intersect(p1: Pos2, p2: Pos2, p3: Pos2, p4: Pos2) -> bool {
    let d = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if d == 0.0 {
        return false;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / d;
    let u = -((p1.x - p2.x) * (p1.y - p3.y) - (p1.y - p2.y) * (p1.x - p3.x)) / d;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Samples only: a stroke that crosses the query between two sparse samples
/// is not reported.
pub fn pen_intersects_rect(pen: &PenGeometry, query: &Rect) -> bool {
    pen.points.iter().any(|p| point_in_rect(p.pos(), query))
}

pub fn rectangle_intersects_rect(rect: &RectGeometry, query: &Rect) -> bool {
    rects_overlap(&rect.normalized(), query)
}

/// Bounding-box approximation: corners outside the circle still hit
pub fn circle_intersects_rect(circle: &CircleGeometry, query: &Rect) -> bool {
    rects_overlap(&Geometry::Circle(*circle).bounds(), query)
}

/// Bounding-box approximation, same as [`circle_intersects_rect`]
pub fn ellipse_intersects_rect(ellipse: &EllipseGeometry, query: &Rect) -> bool {
    rects_overlap(&Geometry::Ellipse(*ellipse).bounds(), query)
}

pub fn line_intersects_rect(line: &LineGeometry, query: &Rect) -> bool {
    let (start, end) = (line.start(), line.end());
    if point_in_rect(start, query) || point_in_rect(end, query) {
        return true;
    }

    let edges = [
        (query.left_top(), query.right_top()),
        (query.right_top(), query.right_bottom()),
        (query.right_bottom(), query.left_bottom()),
        (query.left_bottom(), query.left_top()),
    ];
    edges.iter().any(|&(a, b)| segments_intersect(start, end, a, b))
}

/// Dispatch on the element's kind; `query` must be normalized
pub fn element_intersects_rect(element: &Element, query: &Rect) -> bool {
    match element.geometry() {
        Geometry::Pen(pen) => pen_intersects_rect(pen, query),
        Geometry::Rectangle(rect) => rectangle_intersects_rect(rect, query),
        Geometry::Circle(circle) => circle_intersects_rect(circle, query),
        Geometry::Ellipse(ellipse) => ellipse_intersects_rect(ellipse, query),
        Geometry::Line(line) => line_intersects_rect(line, query),
    }
}
