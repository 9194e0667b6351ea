use egui::{Color32, Mesh, Painter, Pos2, Shape, Stroke, Vec2};

use super::path::fill_triangles;
use super::{CanvasState, PaintState, Surface, SubPath, dedup_points, effective_rgba};

/// Retained display list of egui shapes.
///
/// egui repaints from scratch every frame, so the surface keeps what has been
/// painted so far and the host replays it with [`EguiSurface::paint`].
#[derive(Clone)]
pub struct EguiSurface {
    size: Vec2,
    shapes: Vec<Shape>,
    state: CanvasState,
}

// Shapes can hold texture callbacks, so only summarize them
impl std::fmt::Debug for EguiSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EguiSurface")
            .field("size", &self.size)
            .field("shapes", &self.shapes.len())
            .finish()
    }
}

impl EguiSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            shapes: Vec::new(),
            state: CanvasState::default(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Add the display list to `painter`, with surface (0, 0) placed at `origin`
    pub fn paint(&self, painter: &Painter, origin: Pos2) {
        let offset = origin.to_vec2();
        painter.extend(self.shapes.iter().cloned().map(|mut shape| {
            shape.translate(offset);
            shape
        }));
    }
}

fn to_color(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, a] = effective_rgba(color, opacity);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Every turn bends the same way. Collinear runs are allowed.
fn is_convex(points: &[Pos2]) -> bool {
    let n = points.len();
    let mut sign = 0.0_f32;
    for i in 0..n {
        let (a, b, c) = (points[i], points[(i + 1) % n], points[(i + 2) % n]);
        let cross = (b - a).x * (c - b).y - (b - a).y * (c - b).x;
        if cross.abs() <= f32::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

impl Surface for EguiSurface {
    type Snapshot = Vec<Shape>;

    fn size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
        self.shapes.clear();
        self.state.reset();
    }

    fn canvas_state(&self) -> &CanvasState {
        &self.state
    }

    fn canvas_state_mut(&mut self) -> &mut CanvasState {
        &mut self.state
    }

    fn clear_pixels(&mut self) {
        self.shapes.clear();
    }

    fn fill_subpaths(&mut self, subpaths: &[SubPath], paint: &PaintState) {
        let fill = to_color(paint.fill_color, paint.opacity);
        if fill.a() == 0 {
            return;
        }
        // egui only fills convex polygons itself; anything else goes through lyon
        if let [subpath] = subpaths {
            let mut points = dedup_points(&subpath.points);
            if points.len() > 3 && points.first() == points.last() {
                points.pop();
            }
            if points.len() >= 3 && is_convex(&points) {
                self.shapes.push(Shape::convex_polygon(points, fill, Stroke::NONE));
                return;
            }
        }

        let triangles = fill_triangles(subpaths);
        if triangles.is_empty() {
            return;
        }
        let mut mesh = Mesh::default();
        for [a, b, c] in triangles {
            let base = mesh.vertices.len() as u32;
            mesh.colored_vertex(a, fill);
            mesh.colored_vertex(b, fill);
            mesh.colored_vertex(c, fill);
            mesh.add_triangle(base, base + 1, base + 2);
        }
        self.shapes.push(Shape::mesh(mesh));
    }

    fn stroke_subpaths(&mut self, subpaths: &[SubPath], paint: &PaintState) {
        let stroke = Stroke::new(paint.line_width, to_color(paint.stroke_color, paint.opacity));
        if stroke.color.a() == 0 {
            return;
        }
        for subpath in subpaths {
            let points = dedup_points(&subpath.points);
            match points.len() {
                0 => {}
                1 if subpath.points.len() >= 2 => {
                    self.shapes
                        .push(Shape::circle_filled(points[0], paint.line_width / 2.0, stroke.color));
                }
                1 => {}
                _ if subpath.closed => self.shapes.push(Shape::closed_line(points, stroke)),
                _ => self.shapes.push(Shape::line(points, stroke)),
            }
        }
    }

    fn snapshot(&self) -> Self::Snapshot {
        self.shapes.clone()
    }

    fn restore_snapshot(&mut self, snapshot: &Self::Snapshot) {
        self.shapes.clone_from(snapshot);
    }
}
