use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::{
    DEFAULT_OPACITY, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, ElementKind, FillMode, Style,
};

/// What a gesture produces
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    #[default]
    Pen,
    Rectangle,
    Circle,
    Ellipse,
    Line,
    /// Drag a query rectangle and erase everything it touches
    AreaEraser,
}

impl ToolKind {
    /// Element kind the tool creates, `None` for the eraser
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Pen => Some(ElementKind::Pen),
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Ellipse => Some(ElementKind::Ellipse),
            ToolKind::Line => Some(ElementKind::Line),
            ToolKind::AreaEraser => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self.element_kind() {
            Some(kind) => kind.name(),
            None => "eraser",
        }
    }
}

impl From<ElementKind> for ToolKind {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Pen => ToolKind::Pen,
            ElementKind::Rectangle => ToolKind::Rectangle,
            ElementKind::Circle => ToolKind::Circle,
            ElementKind::Ellipse => ToolKind::Ellipse,
            ElementKind::Line => ToolKind::Line,
        }
    }
}

/// User-facing parameters applied to the next gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolSettings {
    pub stroke_color: Color32,
    pub stroke_width: f32,
    pub fill_color: Option<Color32>,
    pub fill_mode: FillMode,
    pub opacity: f32,
    pub corner_radius: f32,
    /// Record per-sample pressure on pen strokes
    pub pressure_sensitivity: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR,
            stroke_width: DEFAULT_STROKE_WIDTH,
            fill_color: None,
            fill_mode: FillMode::Outline,
            opacity: DEFAULT_OPACITY,
            corner_radius: 0.0,
            pressure_sensitivity: true,
        }
    }
}

impl ToolSettings {
    /// Element style for the settings, normalized
    pub fn style(&self) -> Style {
        Style::new(self.stroke_color, self.stroke_width)
            .with_fill(self.fill_color, self.fill_mode)
            .with_opacity(self.opacity)
    }
}
