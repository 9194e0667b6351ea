use egui::Color32;
use serde::{Deserialize, Serialize};

use super::common::{DEFAULT_OPACITY, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH};

/// Which parts of a shape get painted
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    Outline,
    Filled,
    Both,
}

impl FillMode {
    pub fn fills(self) -> bool {
        matches!(self, Self::Filled | Self::Both)
    }

    pub fn strokes(self) -> bool {
        matches!(self, Self::Outline | Self::Both)
    }
}

/// Paint parameters of one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    pub stroke_color: Color32,
    pub stroke_width: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color32>,
    pub fill_mode: FillMode,
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR,
            stroke_width: DEFAULT_STROKE_WIDTH,
            fill_color: None,
            fill_mode: FillMode::Outline,
            opacity: DEFAULT_OPACITY,
        }
    }
}

impl Style {
    /// Create a style, clamping width and opacity into their valid ranges
    pub fn new(stroke_color: Color32, stroke_width: f32) -> Self {
        Self {
            stroke_color,
            ..Self::default()
        }
        .with_stroke_width(stroke_width)
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = if width.is_finite() { width.max(0.0) } else { DEFAULT_STROKE_WIDTH };
        self
    }

    pub fn with_fill(mut self, fill_color: Option<Color32>, fill_mode: FillMode) -> Self {
        self.fill_color = fill_color;
        self.fill_mode = fill_mode;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { DEFAULT_OPACITY };
        self
    }

    /// Colour used for fills; falls back to the stroke colour
    pub fn effective_fill_color(&self) -> Color32 {
        self.fill_color.unwrap_or(self.stroke_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_defaults() {
        let style = Style::default();
        assert_eq!(style.stroke_width, 5.0);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.fill_mode, FillMode::Outline);
        assert_eq!(style.stroke_color, Color32::BLACK);
    }

    #[test]
    fn test_construction_normalizes() {
        let style = Style::new(Color32::RED, -3.0).with_opacity(1.5);
        assert_eq!(style.stroke_width, 0.0);
        assert_eq!(style.opacity, 1.0);
    }

    #[test]
    fn test_fill_falls_back_to_stroke_color() {
        let style = Style::new(Color32::RED, 2.0).with_fill(None, FillMode::Filled);
        assert_eq!(style.effective_fill_color(), Color32::RED);

        let style = style.with_fill(Some(Color32::GREEN), FillMode::Both);
        assert_eq!(style.effective_fill_color(), Color32::GREEN);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let style: Style = serde_json::from_str(r#"{"fillMode":"both"}"#).unwrap();
        assert_eq!(style.fill_mode, FillMode::Both);
        assert_eq!(style.stroke_width, 5.0);
        assert_eq!(style.opacity, 1.0);
    }
}
