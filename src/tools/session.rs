//! Lifecycle of one pointer gesture.
//!
//! ```text
//!   ┌──────┐  start   ┌────────┐
//!   │ Idle ├─────────►│ Active │──┐ update
//!   │      │◄─────────┤        │◄─┘
//!   └──────┘ finish / └────────┘
//!            cancel
//! ```
//!
//! While active the session owns the working geometry (pen samples or the
//! drag anchor) and a snapshot of the surface taken at `start`, used to
//! repaint previews. Nothing reaches the scene store before `finish`.

use egui::{Color32, Pos2, Rect, pos2};
use log::{debug, warn};

use crate::element::{
    FillMode, Geometry, NewElement, PenPoint, Style, factory,
};
use crate::erase::erase_rect;
use crate::id_generator::ElementId;
use crate::renderer::Renderer;
use crate::scene::SceneStore;
use crate::surface::Surface;

use super::{ToolKind, ToolSettings};

/// Outline colour of the area-eraser preview
pub const ERASER_PREVIEW_STROKE: Color32 = Color32::from_rgb(220, 60, 60);

/// Fill colour of the area-eraser preview
pub const ERASER_PREVIEW_FILL: Color32 = Color32::from_rgba_premultiplied(40, 12, 12, 40);

/// Result of [`ToolSession::finish`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A new element was added to the store
    Committed(ElementId),
    /// The eraser removed this many elements
    Erased(usize),
    /// The gesture produced a pen stroke too short to render
    Discarded,
    /// No gesture was active
    Ignored,
}

#[derive(Debug, Clone)]
enum Working {
    Stroke(Vec<PenPoint>),
    Drag { anchor: Pos2, current: Pos2 },
}

struct Gesture<Snap> {
    tool: ToolKind,
    style: Style,
    corner_radius: f32,
    record_pressure: bool,
    working: Working,
    snapshot: Snap,
}

impl<Snap> Gesture<Snap> {
    fn sample(&self, x: f32, y: f32, pressure: Option<f32>) -> PenPoint {
        match pressure {
            Some(pressure) if self.record_pressure => PenPoint::with_pressure(x, y, pressure),
            _ => PenPoint::new(x, y),
        }
    }

    /// Element described by the working geometry; `None` for the eraser
    fn element(&self) -> Option<NewElement> {
        let style = self.style;
        match (&self.working, self.tool) {
            (Working::Stroke(points), _) => Some(factory::create_pen(style, points.clone())),
            (Working::Drag { anchor, current }, tool) => match tool {
                ToolKind::Rectangle => Some(factory::create_rectangle(
                    style,
                    *anchor,
                    *current,
                    self.corner_radius,
                )),
                ToolKind::Circle => Some(factory::create_circle(style, *anchor, *current)),
                ToolKind::Ellipse => Some(factory::create_ellipse(style, *anchor, *current)),
                ToolKind::Line => Some(factory::create_line(style, *anchor, *current)),
                ToolKind::Pen | ToolKind::AreaEraser => None,
            },
        }
    }

    fn drag_rect(&self) -> Option<Rect> {
        match self.working {
            Working::Drag { anchor, current } => Some(Rect::from_two_pos(anchor, current)),
            Working::Stroke(_) => None,
        }
    }
}

/// At most one gesture at a time; the owner passes the store, renderer and
/// surface in on every call.
pub struct ToolSession<S: Surface> {
    gesture: Option<Gesture<S::Snapshot>>,
}

impl<S: Surface> Default for ToolSession<S> {
    fn default() -> Self {
        Self { gesture: None }
    }
}

impl<S: Surface> std::fmt::Debug for ToolSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSession")
            .field("state", &self.state_name())
            .field("tool", &self.active_tool())
            .field("working", &self.gesture.as_ref().map(|g| &g.working))
            .finish()
    }
}

impl<S: Surface> ToolSession<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.gesture.as_ref().map(|g| g.tool)
    }

    pub fn state_name(&self) -> &'static str {
        if self.is_active() { "active" } else { "idle" }
    }

    /// Number of pen samples recorded so far
    pub fn sample_count(&self) -> usize {
        match self.gesture.as_ref().map(|g| &g.working) {
            Some(Working::Stroke(points)) => points.len(),
            _ => 0,
        }
    }

    /// Begin a gesture. A gesture that is still active (its release was lost)
    /// is discarded first.
    pub fn start(
        &mut self,
        tool: ToolKind,
        settings: &ToolSettings,
        x: f32,
        y: f32,
        pressure: Option<f32>,
        surface: &mut S,
    ) {
        if let Some(previous) = self.gesture.take() {
            warn!("Discarding unfinished {} gesture", previous.tool.name());
            surface.restore_snapshot(&previous.snapshot);
        }

        let mut gesture = Gesture {
            tool,
            style: settings.style(),
            corner_radius: settings.corner_radius.max(0.0),
            record_pressure: settings.pressure_sensitivity,
            working: Working::Drag {
                anchor: pos2(x, y),
                current: pos2(x, y),
            },
            snapshot: surface.snapshot(),
        };
        if tool == ToolKind::Pen {
            gesture.working = Working::Stroke(vec![gesture.sample(x, y, pressure)]);
        }

        debug!("Started {} gesture at ({x}, {y})", tool.name());
        self.gesture = Some(gesture);
    }

    /// Extend the gesture to a new pointer position. No-op while idle.
    pub fn update(
        &mut self,
        x: f32,
        y: f32,
        pressure: Option<f32>,
        renderer: &Renderer,
        surface: &mut S,
    ) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };

        let sample = gesture.sample(x, y, pressure);
        let dragging = match &mut gesture.working {
            Working::Stroke(points) => {
                let previous = points[points.len() - 1];
                points.push(sample);
                renderer.draw_pen_segment(surface, &gesture.style, &previous, &sample);
                false
            }
            Working::Drag { current, .. } => {
                *current = pos2(x, y);
                true
            }
        };
        if dragging {
            Self::paint_preview(gesture, renderer, surface);
        }
    }

    fn paint_preview(gesture: &Gesture<S::Snapshot>, renderer: &Renderer, surface: &mut S) {
        if let Some(element) = gesture.element() {
            renderer.draw_incremental(surface, &gesture.snapshot, &element.style, &element.geometry);
        } else if let Some(rect) = gesture.drag_rect() {
            let style = Style::new(ERASER_PREVIEW_STROKE, 1.0)
                .with_fill(Some(ERASER_PREVIEW_FILL), FillMode::Both);
            let area = factory::create_rectangle(style, rect.min, rect.max, 0.0);
            renderer.draw_incremental(surface, &gesture.snapshot, &area.style, &area.geometry);
        }
    }

    /// Complete the gesture at the release position and return to idle.
    ///
    /// The preview is replaced by the surface snapshot, and the committed
    /// element is painted with the same routine a full redraw uses.
    pub fn finish(
        &mut self,
        x: f32,
        y: f32,
        store: &mut SceneStore,
        renderer: &Renderer,
        surface: &mut S,
    ) -> SessionOutcome {
        let Some(mut gesture) = self.gesture.take() else {
            warn!("Ignoring release at ({x}, {y}) with no active gesture");
            return SessionOutcome::Ignored;
        };

        let release = pos2(x, y);
        match &mut gesture.working {
            Working::Stroke(points) => {
                let last = points[points.len() - 1];
                if last.pos() != release {
                    let pressure = last.pressure;
                    points.push(PenPoint { x, y, pressure });
                }
            }
            Working::Drag { current, .. } => *current = release,
        }

        surface.restore_snapshot(&gesture.snapshot);

        if gesture.tool == ToolKind::AreaEraser {
            let removed = gesture
                .drag_rect()
                .map_or(0, |query| erase_rect(store, renderer, surface, query));
            debug!("Eraser gesture removed {removed} elements");
            return SessionOutcome::Erased(removed);
        }

        let Some(element) = gesture.element() else {
            return SessionOutcome::Discarded;
        };
        if let Geometry::Pen(pen) = &element.geometry {
            if !pen.is_renderable() {
                debug!("Discarding pen stroke with {} points", pen.points.len());
                return SessionOutcome::Discarded;
            }
        }

        let id = store.add_element(element);
        if let Some(committed) = store.get_by_id(id) {
            renderer.draw_element(surface, committed);
        }
        debug!("Committed {} gesture as element {id}", gesture.tool.name());
        SessionOutcome::Committed(id)
    }

    /// Abandon the active gesture, restoring the surface to its state at
    /// `start`. Returns false while idle.
    pub fn cancel(&mut self, surface: &mut S) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                surface.restore_snapshot(&gesture.snapshot);
                debug!("Cancelled {} gesture", gesture.tool.name());
                true
            }
            None => false,
        }
    }
}
