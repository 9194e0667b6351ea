use std::f32::consts::TAU;

use egui::{Pos2, Vec2, pos2};
use lyon::geom::Arc;
use lyon::math::{Angle, Point, point, vector};
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, LineCap, LineJoin, StrokeOptions,
    StrokeTessellator, StrokeVertex, VertexBuffers,
};
use log::warn;

/// Maximum distance in pixels between a curve and its flattened polyline
pub const DEFAULT_FLATTEN_TOLERANCE: f32 = 1.0;

/// One polyline of a flattened path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubPath {
    pub points: Vec<Pos2>,
    pub closed: bool,
}

/// Canvas-style path under construction, recorded as lyon path events.
///
/// Follows canvas rules: `line_to` without a current point acts as
/// `move_to`, an arc is joined to the current point, and drawing after
/// `close` continues from the start of the closed sub-path.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    events: Vec<PathEvent>,
    /// Start of the open sub-path
    first: Option<Point>,
    current: Option<Point>,
    tolerance: f32,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FLATTEN_TOLERANCE)
    }
}

impl PathBuilder {
    pub fn new(tolerance: f32) -> Self {
        Self {
            events: Vec::new(),
            first: None,
            current: None,
            tolerance: tolerance.max(0.05),
        }
    }

    pub fn begin(&mut self) {
        self.events.clear();
        self.first = None;
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn end_open(&mut self, close: bool) {
        if let (Some(first), Some(last)) = (self.first.take(), self.current) {
            self.events.push(PathEvent::End { last, first, close });
        }
    }

    /// Current point, opening a sub-path there if none is open
    fn open_at_current(&mut self) -> Option<Point> {
        let current = self.current?;
        if self.first.is_none() {
            self.events.push(PathEvent::Begin { at: current });
            self.first = Some(current);
        }
        Some(current)
    }

    pub fn move_to(&mut self, to: Pos2) {
        self.end_open(false);
        let at = point(to.x, to.y);
        self.events.push(PathEvent::Begin { at });
        self.first = Some(at);
        self.current = Some(at);
    }

    pub fn line_to(&mut self, to: Pos2) {
        let Some(from) = self.open_at_current() else {
            self.move_to(to);
            return;
        };
        let to = point(to.x, to.y);
        self.events.push(PathEvent::Line { from, to });
        self.current = Some(to);
    }

    pub fn close(&mut self) {
        let first = self.first;
        self.end_open(true);
        if first.is_some() {
            self.current = first;
        }
    }

    pub fn quadratic_to(&mut self, control: Pos2, to: Pos2) {
        let Some(from) = self.open_at_current() else {
            self.move_to(control);
            self.line_to(to);
            return;
        };
        let (ctrl, to) = (point(control.x, control.y), point(to.x, to.y));
        self.events.push(PathEvent::Quadratic { from, ctrl, to });
        self.current = Some(to);
    }

    /// Circular arc, clockwise in screen coordinates from `start` to `end` radians
    pub fn arc(&mut self, center: Pos2, radius: f32, start: f32, end: f32) {
        self.ellipse(center, Vec2::splat(radius), 0.0, start, end);
    }

    /// Elliptical arc; the current point is joined to the arc start
    pub fn ellipse(&mut self, center: Pos2, radii: Vec2, rotation: f32, start: f32, end: f32) {
        let radii = radii.abs();
        let arc = Arc {
            center: point(center.x, center.y),
            radii: vector(radii.x, radii.y),
            start_angle: Angle::radians(start),
            sweep_angle: Angle::radians(normalized_sweep(start, end)),
            x_rotation: Angle::radians(rotation),
        };

        let from = arc.from();
        self.line_to(pos2(from.x, from.y));
        let events = &mut self.events;
        arc.for_each_quadratic_bezier(&mut |segment| {
            events.push(PathEvent::Quadratic {
                from: segment.from,
                ctrl: segment.ctrl,
                to: segment.to,
            });
        });
        self.current = Some(arc.to());
    }

    /// The path flattened into polylines at the builder's tolerance
    pub fn subpaths(&self) -> Vec<SubPath> {
        let trailing = self.first.map(|first| PathEvent::End {
            last: self.current.unwrap_or(first),
            first,
            close: false,
        });

        let mut subpaths: Vec<SubPath> = Vec::new();
        let events = self.events.iter().copied().chain(trailing);
        for event in events.flattened(self.tolerance) {
            match event {
                PathEvent::Begin { at } => subpaths.push(SubPath {
                    points: vec![pos2(at.x, at.y)],
                    closed: false,
                }),
                PathEvent::Line { to, .. } => {
                    if let Some(subpath) = subpaths.last_mut() {
                        subpath.points.push(pos2(to.x, to.y));
                    }
                }
                PathEvent::End { close, .. } => {
                    if let Some(subpath) = subpaths.last_mut() {
                        subpath.closed = close;
                    }
                }
                _ => {}
            }
        }
        subpaths
    }
}

/// Sweep of a clockwise arc, capped at one full turn
fn normalized_sweep(start: f32, end: f32) -> f32 {
    let sweep = end - start;
    if sweep >= TAU {
        TAU
    } else if sweep < 0.0 {
        sweep.rem_euclid(TAU)
    } else {
        sweep
    }
}

/// Lyon path over flattened polylines. Sub-paths with fewer than
/// `min_points` samples are left out.
fn polyline_path(subpaths: &[SubPath], min_points: usize) -> Path {
    let mut builder = Path::builder();
    for subpath in subpaths.iter().filter(|s| s.points.len() >= min_points) {
        let first = subpath.points[0];
        builder.begin(point(first.x, first.y));
        for p in &subpath.points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(subpath.closed);
    }
    builder.build()
}

/// Triangles covering the polylines stroked at `width` with round joins and
/// caps. A zero-length segment yields a dot; a lone point yields nothing.
pub(crate) fn stroke_triangles(subpaths: &[SubPath], width: f32) -> Vec<[Pos2; 3]> {
    let path = polyline_path(subpaths, 2);
    let options = StrokeOptions::tolerance(DEFAULT_FLATTEN_TOLERANCE / 4.0)
        .with_line_width(width)
        .with_line_join(LineJoin::Round)
        .with_line_cap(LineCap::Round);

    let mut buffers: VertexBuffers<Pos2, u32> = VertexBuffers::new();
    let result = StrokeTessellator::new().tessellate_path(
        &path,
        &options,
        &mut BuffersBuilder::new(&mut buffers, |vertex: StrokeVertex<'_, '_>| {
            let p = vertex.position();
            pos2(p.x, p.y)
        }),
    );
    if let Err(err) = result {
        warn!("Stroke tessellation failed: {err:?}");
        return Vec::new();
    }
    triangles(&buffers)
}

/// Triangles covering the closed polylines under the non-zero winding rule
pub(crate) fn fill_triangles(subpaths: &[SubPath]) -> Vec<[Pos2; 3]> {
    let path = polyline_path(subpaths, 3);
    let options = FillOptions::non_zero().with_tolerance(DEFAULT_FLATTEN_TOLERANCE / 4.0);

    let mut buffers: VertexBuffers<Pos2, u32> = VertexBuffers::new();
    let result = FillTessellator::new().tessellate_path(
        &path,
        &options,
        &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex<'_>| {
            let p = vertex.position();
            pos2(p.x, p.y)
        }),
    );
    if let Err(err) = result {
        warn!("Fill tessellation failed: {err:?}");
        return Vec::new();
    }
    triangles(&buffers)
}

fn triangles(buffers: &VertexBuffers<Pos2, u32>) -> Vec<[Pos2; 3]> {
    buffers
        .indices
        .chunks_exact(3)
        .map(|tri| [0, 1, 2].map(|i| buffers.vertices[tri[i] as usize]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_build_one_subpath() {
        let mut path = PathBuilder::default();
        path.move_to(pos2(0.0, 0.0));
        path.line_to(pos2(10.0, 0.0));
        path.line_to(pos2(10.0, 10.0));
        path.close();
        let subpaths = path.subpaths();
        assert_eq!(subpaths.len(), 1);
        assert_eq!(subpaths[0].points.len(), 3);
        assert!(subpaths[0].closed);
    }

    #[test]
    fn test_full_circle_returns_to_start() {
        let mut path = PathBuilder::default();
        path.arc(pos2(50.0, 50.0), 10.0, 0.0, TAU);
        let subpaths = path.subpaths();
        let points = &subpaths[0].points;
        let first = points[0];
        let last = points[points.len() - 1];
        assert!(first.distance(pos2(60.0, 50.0)) < 1e-4);
        assert!(first.distance(last) < 1e-3);
        assert!(points.len() > 4);
    }

    #[test]
    fn test_quadratic_ends_on_target() {
        let mut path = PathBuilder::default();
        path.move_to(pos2(0.0, 0.0));
        path.quadratic_to(pos2(10.0, 10.0), pos2(20.0, 0.0));
        let subpaths = path.subpaths();
        let end = *subpaths[0].points.last().unwrap();
        assert!(end.distance(pos2(20.0, 0.0)) < 1e-4);
        assert!(subpaths[0].points.len() > 2);
    }

    #[test]
    fn test_line_after_close_starts_new_subpath() {
        let mut path = PathBuilder::default();
        path.move_to(pos2(0.0, 0.0));
        path.line_to(pos2(5.0, 0.0));
        path.close();
        path.line_to(pos2(5.0, 5.0));
        let subpaths = path.subpaths();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1].points, vec![pos2(0.0, 0.0), pos2(5.0, 5.0)]);
    }

    #[test]
    fn test_lone_point_strokes_nothing() {
        let lone = SubPath {
            points: vec![pos2(3.0, 3.0)],
            closed: false,
        };
        assert!(stroke_triangles(&[lone], 4.0).is_empty());
    }

    #[test]
    fn test_concave_fill_triangles_skip_notch() {
        let l_shape = SubPath {
            points: vec![
                pos2(0.0, 0.0),
                pos2(40.0, 0.0),
                pos2(40.0, 40.0),
                pos2(20.0, 40.0),
                pos2(20.0, 20.0),
                pos2(0.0, 20.0),
            ],
            closed: true,
        };
        let triangles = fill_triangles(&[l_shape]);
        assert!(!triangles.is_empty());
        let area: f32 = triangles
            .iter()
            .map(|[a, b, c]| ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0)
            .sum();
        assert!((area - 1200.0).abs() < 1e-2);
    }
}
