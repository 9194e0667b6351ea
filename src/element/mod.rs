use std::sync::Arc;

use egui::Rect;
use serde::{Deserialize, Serialize};

mod common;
mod shapes;
mod style;

pub use common::{
    DEFAULT_OPACITY, DEFAULT_PRESSURE, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH,
    MIN_RENDERABLE_PEN_POINTS,
};
pub use shapes::{
    CircleGeometry, EllipseGeometry, Geometry, LineGeometry, PenGeometry, PenPoint, RectGeometry,
};
pub use style::{FillMode, Style};

use crate::id_generator::ElementId;

/// The closed set of shapes a scene can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Pen,
    Rectangle,
    Circle,
    Ellipse,
    Line,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Pen,
        ElementKind::Rectangle,
        ElementKind::Circle,
        ElementKind::Ellipse,
        ElementKind::Line,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Pen => "pen",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Line => "line",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An element that has not been added to a store yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewElement {
    pub style: Style,
    pub geometry: Geometry,
}

impl NewElement {
    pub fn new(style: Style, geometry: Geometry) -> Self {
        Self { style, geometry }
    }

    pub fn kind(&self) -> ElementKind {
        self.geometry.kind()
    }
}

/// One committed drawing element. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ElementRecord", try_from = "ElementRecord")]
pub struct Element {
    id: ElementId,
    created_at: u64,
    style: Style,
    geometry: Geometry,
}

/// Shared handle to a committed element
pub type ElementRef = Arc<Element>;

impl Element {
    pub(crate) fn new(id: ElementId, created_at: u64, new: NewElement) -> Self {
        Self {
            id,
            created_at,
            style: new.style,
            geometry: new.geometry,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.geometry.kind()
    }

    /// Informational creation time in milliseconds; paint order comes from the store
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    /// Copy of the element's content without its identity, for re-adding
    pub fn to_new_element(&self) -> NewElement {
        NewElement::new(self.style, self.geometry.clone())
    }
}

/// Persisted form of an element: `{ id, kind, createdAt, style, geometry }`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementRecord {
    id: ElementId,
    kind: ElementKind,
    #[serde(default)]
    created_at: u64,
    #[serde(default)]
    style: Style,
    #[serde(default = "empty_object")]
    geometry: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl From<Element> for ElementRecord {
    fn from(element: Element) -> Self {
        // Geometry structs only hold numbers, so encoding cannot fail
        let geometry = element.geometry.to_value().unwrap_or_else(|_| empty_object());
        Self {
            id: element.id,
            kind: element.kind(),
            created_at: element.created_at,
            style: element.style,
            geometry,
        }
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = serde_json::Error;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let geometry = Geometry::from_value(record.kind, record.geometry)?;
        Ok(Self {
            id: record.id,
            created_at: record.created_at,
            style: record.style,
            geometry,
        })
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;
    use egui::Pos2;

    /// Freehand stroke from its samples
    pub fn create_pen(style: Style, points: Vec<PenPoint>) -> NewElement {
        NewElement::new(style, Geometry::Pen(PenGeometry::new(points)))
    }

    /// Rectangle from an anchor corner and a signed extent
    pub fn create_rectangle(style: Style, anchor: Pos2, to: Pos2, corner_radius: f32) -> NewElement {
        NewElement::new(
            style,
            Geometry::Rectangle(RectGeometry {
                x: anchor.x,
                y: anchor.y,
                width: to.x - anchor.x,
                height: to.y - anchor.y,
                corner_radius: corner_radius.max(0.0),
            }),
        )
    }

    /// Circle centred on `center` passing through `edge`
    pub fn create_circle(style: Style, center: Pos2, edge: Pos2) -> NewElement {
        NewElement::new(
            style,
            Geometry::Circle(CircleGeometry {
                center_x: center.x,
                center_y: center.y,
                radius: center.distance(edge),
            }),
        )
    }

    /// Ellipse inscribed in the box spanned by two corners
    pub fn create_ellipse(style: Style, corner: Pos2, opposite: Pos2) -> NewElement {
        NewElement::new(
            style,
            Geometry::Ellipse(EllipseGeometry {
                center_x: (corner.x + opposite.x) / 2.0,
                center_y: (corner.y + opposite.y) / 2.0,
                radius_x: (opposite.x - corner.x).abs() / 2.0,
                radius_y: (opposite.y - corner.y).abs() / 2.0,
            }),
        )
    }

    pub fn create_line(style: Style, start: Pos2, end: Pos2) -> NewElement {
        NewElement::new(
            style,
            Geometry::Line(LineGeometry {
                start_x: start.x,
                start_y: start.y,
                end_x: end.x,
                end_y: end.y,
            }),
        )
    }
}
