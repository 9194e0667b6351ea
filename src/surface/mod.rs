//! Immediate-mode 2D drawing surfaces.
//!
//! [`Surface`] mirrors a canvas context: a current path built with
//! move/line/curve/arc calls, a paint state (colours, line width, opacity)
//! that can be saved and restored, and fill/stroke calls that paint the
//! current path. Backends only implement pixel-level operations; the path and
//! state handling is shared through [`CanvasState`].

use egui::{Color32, Pos2, Vec2, pos2};

mod egui_surface;
mod path;
mod raster;

pub use egui_surface::EguiSurface;
pub use path::{DEFAULT_FLATTEN_TOLERANCE, PathBuilder, SubPath};
pub use raster::RasterSurface;

/// Paint parameters applied by `fill` and `stroke`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    pub stroke_color: Color32,
    pub fill_color: Color32,
    pub line_width: f32,
    pub opacity: f32,
}

impl PaintState {
    /// Neutral defaults a freshly cleared surface starts with
    pub const NEUTRAL: Self = Self {
        stroke_color: Color32::BLACK,
        fill_color: Color32::BLACK,
        line_width: 1.0,
        opacity: 1.0,
    };
}

impl Default for PaintState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Path under construction plus the paint-state stack
#[derive(Debug, Clone, Default)]
pub struct CanvasState {
    pub path: PathBuilder,
    paint: PaintState,
    saved: Vec<PaintState>,
}

impl CanvasState {
    pub fn new(flatten_tolerance: f32) -> Self {
        Self {
            path: PathBuilder::new(flatten_tolerance),
            paint: PaintState::NEUTRAL,
            saved: Vec::new(),
        }
    }

    pub fn paint(&self) -> &PaintState {
        &self.paint
    }

    pub fn paint_mut(&mut self) -> &mut PaintState {
        &mut self.paint
    }

    pub fn save(&mut self) {
        self.saved.push(self.paint);
    }

    /// Pops the last saved state; an unbalanced restore is ignored like on a canvas
    pub fn restore(&mut self) {
        if let Some(paint) = self.saved.pop() {
            self.paint = paint;
        }
    }

    /// Number of outstanding `save` calls
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn reset(&mut self) {
        self.path.begin();
        self.paint = PaintState::NEUTRAL;
        self.saved.clear();
    }
}

/// A drawing surface the renderer paints onto
pub trait Surface {
    /// Copy of the surface contents for preview compositing
    type Snapshot: Clone;

    fn size(&self) -> Vec2;

    /// Replace the surface with a blank one of the new size.
    ///
    /// # Panics
    ///
    /// [`RasterSurface`] panics if either dimension is zero.
    fn resize(&mut self, width: u32, height: u32);

    fn canvas_state(&self) -> &CanvasState;

    fn canvas_state_mut(&mut self) -> &mut CanvasState;

    /// Erase every pixel to the surface background
    fn clear_pixels(&mut self);

    fn fill_subpaths(&mut self, subpaths: &[SubPath], paint: &PaintState);

    fn stroke_subpaths(&mut self, subpaths: &[SubPath], paint: &PaintState);

    fn snapshot(&self) -> Self::Snapshot;

    /// Replace the surface contents with a snapshot taken earlier
    fn restore_snapshot(&mut self, snapshot: &Self::Snapshot);

    /// Clear the pixels and reset path and paint state to neutral defaults
    fn clear(&mut self) {
        self.clear_pixels();
        self.canvas_state_mut().reset();
    }

    fn begin_path(&mut self) {
        self.canvas_state_mut().path.begin();
    }

    fn close_path(&mut self) {
        self.canvas_state_mut().path.close();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.canvas_state_mut().path.move_to(pos2(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.canvas_state_mut().path.line_to(pos2(x, y));
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.canvas_state_mut().path.quadratic_to(pos2(cx, cy), pos2(x, y));
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.canvas_state_mut()
            .path
            .arc(pos2(cx, cy), radius, start_angle, end_angle);
    }

    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
    ) {
        self.canvas_state_mut().path.ellipse(
            pos2(cx, cy),
            Vec2::new(radius_x, radius_y),
            rotation,
            start_angle,
            end_angle,
        );
    }

    fn fill(&mut self) {
        let state = self.canvas_state();
        let subpaths = state.path.subpaths();
        let paint = *state.paint();
        self.fill_subpaths(&subpaths, &paint);
    }

    fn stroke(&mut self) {
        let state = self.canvas_state();
        let subpaths = state.path.subpaths();
        let paint = *state.paint();
        self.stroke_subpaths(&subpaths, &paint);
    }

    fn set_stroke_color(&mut self, color: Color32) {
        self.canvas_state_mut().paint_mut().stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color32) {
        self.canvas_state_mut().paint_mut().fill_color = color;
    }

    /// Non-positive or non-finite widths are ignored, as on a canvas
    fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.canvas_state_mut().paint_mut().line_width = width;
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_finite() {
            self.canvas_state_mut().paint_mut().opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn save(&mut self) {
        self.canvas_state_mut().save();
    }

    fn restore(&mut self) {
        self.canvas_state_mut().restore();
    }

    fn paint_state(&self) -> PaintState {
        *self.canvas_state().paint()
    }
}

/// Colour with the paint opacity folded into its alpha, unmultiplied
pub(crate) fn effective_rgba(color: Color32, opacity: f32) -> [u8; 4] {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let alpha = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    [r, g, b, alpha]
}

/// Drop consecutive duplicate points
pub(crate) fn dedup_points(points: &[Pos2]) -> Vec<Pos2> {
    let mut out: Vec<Pos2> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}
