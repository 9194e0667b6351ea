//! Persisted element lists.
//!
//! A snapshot stores elements field-for-field (`id`, `kind`, `createdAt`,
//! `style`, `geometry`) so a scene can be rebuilt by re-adding the elements in
//! order and redrawing. This is the load boundary: records with an unknown
//! kind are skipped one by one, decoded records that break a model constraint
//! reject the whole import.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind, Geometry, Style};
use crate::error::{PersistenceError, PersistenceResult, ValidationError};
use crate::id_generator::ElementId;
use crate::scene::SceneStore;
use crate::util::time;

/// Version of the snapshot layout written by [`SceneSnapshot::to_json`]
pub const FORMAT_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub version: u64,
    /// Crate version that wrote the snapshot
    pub generator: String,
    /// Milliseconds since the UNIX epoch
    pub saved_at: u64,
    pub elements: Vec<Element>,
}

/// Snapshot as read from disk, before per-element decoding
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    version: u64,
    #[serde(default)]
    generator: String,
    #[serde(default)]
    saved_at: u64,
    #[serde(default)]
    elements: Vec<serde_json::Value>,
}

impl SceneSnapshot {
    /// Copy of the store's elements in paint order
    pub fn capture(store: &SceneStore) -> Self {
        Self {
            version: FORMAT_VERSION,
            generator: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: time::timestamp_millis(),
            elements: store.elements().iter().map(|e| Element::clone(e)).collect(),
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        if raw.version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: raw.version,
                expected: FORMAT_VERSION,
            });
        }
        if raw.generator != env!("CARGO_PKG_VERSION") {
            info!(
                "Loading scene written by version {} (current {})",
                raw.generator,
                env!("CARGO_PKG_VERSION")
            );
        }

        let mut elements = Vec::with_capacity(raw.elements.len());
        for (index, value) in raw.elements.into_iter().enumerate() {
            let element: Element = match serde_json::from_value(value) {
                Ok(element) => element,
                Err(err) => {
                    warn!("Skipping unreadable element at index {index}: {err}");
                    continue;
                }
            };
            validate_element(&element)
                .map_err(|source| PersistenceError::InvalidElement { index, source })?;
            elements.push(element);
        }

        Ok(Self {
            version: raw.version,
            generator: raw.generator,
            saved_at: raw.saved_at,
            elements,
        })
    }

    /// Replace the store's contents with the snapshot's elements, in order.
    /// Elements receive fresh ids; the caller redraws afterwards.
    pub fn restore(&self, store: &mut SceneStore) -> Vec<ElementId> {
        store.clear();
        self.elements
            .iter()
            .map(|element| store.add_element(element.to_new_element()))
            .collect()
    }
}

fn check_finite(kind: ElementKind, field: &'static str, value: f32) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { kind, field })
    }
}

fn check_non_negative(
    kind: ElementKind,
    field: &'static str,
    value: f32,
) -> Result<(), ValidationError> {
    check_finite(kind, field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { kind, field, value });
    }
    Ok(())
}

fn check_unit(kind: ElementKind, field: &'static str, value: f32) -> Result<(), ValidationError> {
    check_finite(kind, field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfUnitRange { kind, field, value });
    }
    Ok(())
}

fn validate_style(kind: ElementKind, style: &Style) -> Result<(), ValidationError> {
    check_non_negative(kind, "strokeWidth", style.stroke_width)?;
    check_unit(kind, "opacity", style.opacity)
}

/// Check a decoded element against the model's constraints
pub fn validate_element(element: &Element) -> Result<(), ValidationError> {
    let kind = element.kind();
    validate_style(kind, element.style())?;

    match element.geometry() {
        Geometry::Pen(pen) => {
            for point in &pen.points {
                check_finite(kind, "x", point.x)?;
                check_finite(kind, "y", point.y)?;
                if let Some(pressure) = point.pressure {
                    check_unit(kind, "pressure", pressure)?;
                }
            }
        }
        Geometry::Rectangle(rect) => {
            check_finite(kind, "x", rect.x)?;
            check_finite(kind, "y", rect.y)?;
            check_finite(kind, "width", rect.width)?;
            check_finite(kind, "height", rect.height)?;
            check_non_negative(kind, "cornerRadius", rect.corner_radius)?;
        }
        Geometry::Circle(circle) => {
            check_finite(kind, "centerX", circle.center_x)?;
            check_finite(kind, "centerY", circle.center_y)?;
            check_non_negative(kind, "radius", circle.radius)?;
        }
        Geometry::Ellipse(ellipse) => {
            check_finite(kind, "centerX", ellipse.center_x)?;
            check_finite(kind, "centerY", ellipse.center_y)?;
            check_non_negative(kind, "radiusX", ellipse.radius_x)?;
            check_non_negative(kind, "radiusY", ellipse.radius_y)?;
        }
        Geometry::Line(line) => {
            check_finite(kind, "startX", line.start_x)?;
            check_finite(kind, "startY", line.start_y)?;
            check_finite(kind, "endX", line.end_x)?;
            check_finite(kind, "endY", line.end_y)?;
        }
    }
    Ok(())
}
