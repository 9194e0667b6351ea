use egui::{Color32, Pos2, Rect};

// Defaults applied when an element or its style is built without explicit values
pub const DEFAULT_STROKE_COLOR: Color32 = Color32::BLACK;
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;
pub const DEFAULT_OPACITY: f32 = 1.0;

/// Pressure assumed for samples that arrive without one
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// Minimum number of pen samples needed to paint anything
pub const MIN_RENDERABLE_PEN_POINTS: usize = 2;

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: impl IntoIterator<Item = Pos2>) -> Rect {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    let mut any = false;

    for point in points {
        any = true;
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    if !any {
        return Rect::NOTHING;
    }

    Rect::from_min_max(Pos2::new(min_x, min_y), Pos2::new(max_x, max_y))
}
