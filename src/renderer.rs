//! Replays elements onto a [`Surface`].
//!
//! Every element is painted between `save` and `restore`, so colours, widths
//! and opacity never leak from one element into the next. The output depends
//! only on the surface size and the ordered element list.

use std::f32::consts::TAU;

use egui::{Pos2, vec2};
use log::trace;

use crate::element::{
    CircleGeometry, Element, ElementRef, EllipseGeometry, FillMode, Geometry, LineGeometry,
    PenGeometry, PenPoint, RectGeometry, Style,
};
use crate::surface::Surface;
use crate::tools::PressureCurve;

/// Border width used when a line is drawn in `both` mode
pub const LINE_BORDER_WIDTH: f32 = 1.0;

/// Renderer configuration
#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Maps pen pressure to a width multiplier
    pub pressure: PressureCurve,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Clear the surface and paint `elements` in order
    pub fn redraw_all<S: Surface>(&self, surface: &mut S, elements: &[ElementRef]) {
        surface.clear();
        for element in elements {
            self.draw_element(surface, element);
        }
        trace!("Redrew {} elements", elements.len());
    }

    pub fn draw_element<S: Surface>(&self, surface: &mut S, element: &Element) {
        trace!("Drawing {} element {}", element.kind(), element.id());
        self.draw_shape(surface, element.style(), element.geometry());
    }

    /// Paint one shape with its own style, leaving the paint state as it was
    pub fn draw_shape<S: Surface>(&self, surface: &mut S, style: &Style, geometry: &Geometry) {
        surface.save();
        surface.set_opacity(style.opacity);
        surface.set_stroke_color(style.stroke_color);
        surface.set_fill_color(style.effective_fill_color());
        surface.set_line_width(style.stroke_width);

        match geometry {
            Geometry::Pen(pen) => self.draw_pen(surface, style, pen),
            Geometry::Rectangle(rect) => draw_rectangle(surface, style, rect),
            Geometry::Circle(circle) => draw_circle(surface, style, circle),
            Geometry::Ellipse(ellipse) => draw_ellipse(surface, style, ellipse),
            Geometry::Line(line) => draw_line(surface, style, line),
        }

        surface.restore();
    }

    /// Preview of an in-progress shape over the surface as it was at gesture start
    pub fn draw_incremental<S: Surface>(
        &self,
        surface: &mut S,
        snapshot: &S::Snapshot,
        style: &Style,
        geometry: &Geometry,
    ) {
        surface.restore_snapshot(snapshot);
        self.draw_shape(surface, style, geometry);
    }

    /// Paint the newest segment of a pen stroke without touching the rest
    pub fn draw_pen_segment<S: Surface>(
        &self,
        surface: &mut S,
        style: &Style,
        from: &PenPoint,
        to: &PenPoint,
    ) {
        if style.stroke_width <= 0.0 {
            return;
        }
        surface.save();
        surface.set_opacity(style.opacity);
        surface.set_stroke_color(style.stroke_color);
        surface.set_line_width(self.segment_width(style, from, to));
        surface.begin_path();
        surface.move_to(from.x, from.y);
        surface.line_to(to.x, to.y);
        surface.stroke();
        surface.restore();
    }

    fn segment_width(&self, style: &Style, from: &PenPoint, to: &PenPoint) -> f32 {
        match (from.pressure, to.pressure) {
            (None, None) => style.stroke_width,
            _ => {
                let pressure = (from.pressure_or_default() + to.pressure_or_default()) / 2.0;
                style.stroke_width * self.options.pressure.scale(pressure)
            }
        }
    }

    fn draw_pen<S: Surface>(&self, surface: &mut S, style: &Style, pen: &PenGeometry) {
        if !pen.is_renderable() {
            trace!("Skipping pen stroke with {} points", pen.points.len());
            return;
        }

        if style.fill_mode.fills() {
            smoothed_pen_path(surface, &pen.points);
            surface.close_path();
            surface.fill();
        }
        if !strokes(style) {
            return;
        }

        if pen.has_pressure() {
            self.fill_pressure_outline(surface, style, &pen.points);
        } else {
            smoothed_pen_path(surface, &pen.points);
            surface.stroke();
        }
    }

    /// Variable-width stroke as one filled path: a band per segment plus a
    /// round cap at each end. Every part winds the same way, so one non-zero
    /// fill paints the union and blends each pixel once.
    fn fill_pressure_outline<S: Surface>(&self, surface: &mut S, style: &Style, points: &[PenPoint]) {
        surface.set_fill_color(style.stroke_color);
        surface.begin_path();
        for pair in points.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let half_width = self.segment_width(style, from, to) / 2.0;
            if half_width <= 0.0 {
                continue;
            }
            let (a, b) = (from.pos(), to.pos());
            if a != b {
                let direction = (b - a).normalized();
                let normal = vec2(-direction.y, direction.x) * half_width;
                let band = [a - normal, b - normal, b + normal, a + normal];
                surface.move_to(band[0].x, band[0].y);
                for corner in &band[1..] {
                    surface.line_to(corner.x, corner.y);
                }
                surface.close_path();
            }
            for cap in [a, b] {
                surface.move_to(cap.x + half_width, cap.y);
                surface.arc(cap.x, cap.y, half_width, 0.0, TAU);
                surface.close_path();
            }
        }
        surface.fill();
    }
}

fn strokes(style: &Style) -> bool {
    style.fill_mode.strokes() && style.stroke_width > 0.0
}

/// Fill and/or stroke the current path according to the fill mode
fn paint_path<S: Surface>(surface: &mut S, style: &Style) {
    if style.fill_mode.fills() {
        surface.fill();
    }
    if strokes(style) {
        surface.stroke();
    }
}

/// Quadratic curves through the midpoints between samples
fn smoothed_pen_path<S: Surface>(surface: &mut S, points: &[PenPoint]) {
    surface.begin_path();
    surface.move_to(points[0].x, points[0].y);
    for pair in points[1..].windows(2) {
        let mid_x = (pair[0].x + pair[1].x) / 2.0;
        let mid_y = (pair[0].y + pair[1].y) / 2.0;
        surface.quadratic_curve_to(pair[0].x, pair[0].y, mid_x, mid_y);
    }
    let last = points[points.len() - 1];
    surface.line_to(last.x, last.y);
}

fn draw_rectangle<S: Surface>(surface: &mut S, style: &Style, rect: &RectGeometry) {
    let bounds = rect.normalized();
    let radius = rect.clamped_corner_radius();

    surface.begin_path();
    if radius > 0.0 {
        let (left, top, right, bottom) = (bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y);
        surface.move_to(left + radius, top);
        surface.line_to(right - radius, top);
        surface.arc(right - radius, top + radius, radius, -TAU / 4.0, 0.0);
        surface.line_to(right, bottom - radius);
        surface.arc(right - radius, bottom - radius, radius, 0.0, TAU / 4.0);
        surface.line_to(left + radius, bottom);
        surface.arc(left + radius, bottom - radius, radius, TAU / 4.0, TAU / 2.0);
        surface.line_to(left, top + radius);
        surface.arc(left + radius, top + radius, radius, TAU / 2.0, TAU * 0.75);
    } else {
        surface.move_to(bounds.min.x, bounds.min.y);
        surface.line_to(bounds.max.x, bounds.min.y);
        surface.line_to(bounds.max.x, bounds.max.y);
        surface.line_to(bounds.min.x, bounds.max.y);
    }
    surface.close_path();
    paint_path(surface, style);
}

fn draw_circle<S: Surface>(surface: &mut S, style: &Style, circle: &CircleGeometry) {
    surface.begin_path();
    surface.arc(circle.center_x, circle.center_y, circle.radius.abs(), 0.0, TAU);
    surface.close_path();
    paint_path(surface, style);
}

fn draw_ellipse<S: Surface>(surface: &mut S, style: &Style, ellipse: &EllipseGeometry) {
    surface.begin_path();
    surface.ellipse(
        ellipse.center_x,
        ellipse.center_y,
        ellipse.radius_x.abs(),
        ellipse.radius_y.abs(),
        0.0,
        0.0,
        TAU,
    );
    surface.close_path();
    paint_path(surface, style);
}

/// Corners of the rectangle of width `stroke_width` that covers a line
fn line_band(line: &LineGeometry, stroke_width: f32) -> [Pos2; 4] {
    let angle = line.angle();
    let half = stroke_width / 2.0;
    let normal = vec2(-angle.sin(), angle.cos()) * half;
    let (start, end) = (line.start(), line.end());
    [start + normal, end + normal, end - normal, start - normal]
}

fn draw_line<S: Surface>(surface: &mut S, style: &Style, line: &LineGeometry) {
    match style.fill_mode {
        FillMode::Outline => {
            if style.stroke_width > 0.0 {
                surface.begin_path();
                surface.move_to(line.start_x, line.start_y);
                surface.line_to(line.end_x, line.end_y);
                surface.stroke();
            }
        }
        FillMode::Filled | FillMode::Both => {
            let band = line_band(line, style.stroke_width);
            surface.begin_path();
            surface.move_to(band[0].x, band[0].y);
            for corner in &band[1..] {
                surface.line_to(corner.x, corner.y);
            }
            surface.close_path();
            surface.fill();
            if style.fill_mode == FillMode::Both {
                surface.set_line_width(LINE_BORDER_WIDTH);
                surface.stroke();
            }
        }
    }
}
