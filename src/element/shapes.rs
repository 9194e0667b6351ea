use egui::{Pos2, Rect, pos2};
use serde::{Deserialize, Serialize};

use super::common::{DEFAULT_PRESSURE, MIN_RENDERABLE_PEN_POINTS, calculate_bounds};

/// One pen sample. Pressure only influences rendering, never hit-testing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenPoint {
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
}

impl PenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, pressure: None }
    }

    pub fn with_pressure(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            x,
            y,
            pressure: Some(pressure.clamp(0.0, 1.0)),
        }
    }

    pub fn pos(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn pressure_or_default(&self) -> f32 {
        self.pressure.unwrap_or(DEFAULT_PRESSURE)
    }
}

/// Freehand stroke
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenGeometry {
    pub points: Vec<PenPoint>,
}

impl PenGeometry {
    pub fn new(points: Vec<PenPoint>) -> Self {
        Self { points }
    }

    pub fn is_renderable(&self) -> bool {
        self.points.len() >= MIN_RENDERABLE_PEN_POINTS
    }

    pub fn has_pressure(&self) -> bool {
        self.points.iter().any(|p| p.pressure.is_some())
    }
}

/// Axis-aligned rectangle; negative width/height put the opposite corner at `(x, y)`
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RectGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl RectGeometry {
    /// The rectangle with its corners sorted
    pub fn normalized(&self) -> Rect {
        Rect::from_two_pos(pos2(self.x, self.y), pos2(self.x + self.width, self.y + self.height))
    }

    /// Corner radius limited to half of the shorter side
    pub fn clamped_corner_radius(&self) -> f32 {
        let limit = self.width.abs().min(self.height.abs()) / 2.0;
        self.corner_radius.clamp(0.0, limit)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircleGeometry {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl CircleGeometry {
    pub fn center(&self) -> Pos2 {
        pos2(self.center_x, self.center_y)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EllipseGeometry {
    pub center_x: f32,
    pub center_y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
}

impl EllipseGeometry {
    pub fn center(&self) -> Pos2 {
        pos2(self.center_x, self.center_y)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineGeometry {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

impl LineGeometry {
    pub fn start(&self) -> Pos2 {
        pos2(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Pos2 {
        pos2(self.end_x, self.end_y)
    }

    pub fn length(&self) -> f32 {
        self.start().distance(self.end())
    }

    /// Direction of the line in radians
    pub fn angle(&self) -> f32 {
        (self.end_y - self.start_y).atan2(self.end_x - self.start_x)
    }
}

/// Shape data keyed by element kind
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Pen(PenGeometry),
    Rectangle(RectGeometry),
    Circle(CircleGeometry),
    Ellipse(EllipseGeometry),
    Line(LineGeometry),
}

impl Geometry {
    pub fn kind(&self) -> super::ElementKind {
        use super::ElementKind;
        match self {
            Geometry::Pen(_) => ElementKind::Pen,
            Geometry::Rectangle(_) => ElementKind::Rectangle,
            Geometry::Circle(_) => ElementKind::Circle,
            Geometry::Ellipse(_) => ElementKind::Ellipse,
            Geometry::Line(_) => ElementKind::Line,
        }
    }

    /// Axis-aligned bounds of the geometry itself, ignoring stroke width
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Pen(pen) => calculate_bounds(pen.points.iter().map(PenPoint::pos)),
            Geometry::Rectangle(rect) => rect.normalized(),
            Geometry::Circle(circle) => {
                let r = circle.radius.abs();
                Rect::from_center_size(circle.center(), egui::vec2(2.0 * r, 2.0 * r))
            }
            Geometry::Ellipse(ellipse) => Rect::from_center_size(
                ellipse.center(),
                egui::vec2(2.0 * ellipse.radius_x.abs(), 2.0 * ellipse.radius_y.abs()),
            ),
            Geometry::Line(line) => Rect::from_two_pos(line.start(), line.end()),
        }
    }

    /// Encode the kind-specific payload for persistence
    pub(crate) fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Geometry::Pen(g) => serde_json::to_value(g),
            Geometry::Rectangle(g) => serde_json::to_value(g),
            Geometry::Circle(g) => serde_json::to_value(g),
            Geometry::Ellipse(g) => serde_json::to_value(g),
            Geometry::Line(g) => serde_json::to_value(g),
        }
    }

    /// Decode a kind-specific payload written by [`Geometry::to_value`]
    pub(crate) fn from_value(
        kind: super::ElementKind,
        value: serde_json::Value,
    ) -> serde_json::Result<Self> {
        use super::ElementKind;
        Ok(match kind {
            ElementKind::Pen => Geometry::Pen(serde_json::from_value(value)?),
            ElementKind::Rectangle => Geometry::Rectangle(serde_json::from_value(value)?),
            ElementKind::Circle => Geometry::Circle(serde_json::from_value(value)?),
            ElementKind::Ellipse => Geometry::Ellipse(serde_json::from_value(value)?),
            ElementKind::Line => Geometry::Line(serde_json::from_value(value)?),
        })
    }
}
