//! One drawing surface together with everything that paints onto it.
//!
//! `SketchCanvas` owns the scene store, the renderer, the active tool
//! session and the surface, and routes pointer events between them. Each
//! canvas is independent: two canvases never share ids or elements.

use log::{debug, info};

use crate::erase;
use crate::error::PersistenceResult;
use crate::persistence::SceneSnapshot;
use crate::renderer::{RenderOptions, Renderer};
use crate::scene::SceneStore;
use crate::surface::Surface;
use crate::tools::{SessionOutcome, ToolKind, ToolSession, ToolSettings};

#[derive(Debug)]
pub struct SketchCanvas<S: Surface> {
    store: SceneStore,
    renderer: Renderer,
    surface: S,
    session: ToolSession<S>,
    tool: ToolKind,
    settings: ToolSettings,
}

impl<S: Surface> SketchCanvas<S> {
    pub fn new(surface: S) -> Self {
        Self::with_options(surface, RenderOptions::default())
    }

    pub fn with_options(surface: S, options: RenderOptions) -> Self {
        Self {
            store: SceneStore::new(),
            renderer: Renderer::new(options),
            surface,
            session: ToolSession::new(),
            tool: ToolKind::default(),
            settings: ToolSettings::default(),
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Select the tool for the next gesture. The active gesture keeps the
    /// tool it started with.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            debug!("Tool changed: {} -> {}", self.tool.name(), tool.name());
            self.tool = tool;
        }
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn session(&self) -> &ToolSession<S> {
        &self.session
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, pressure: Option<f32>) {
        self.session
            .start(self.tool, &self.settings, x, y, pressure, &mut self.surface);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, pressure: Option<f32>) {
        self.session
            .update(x, y, pressure, &self.renderer, &mut self.surface);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> SessionOutcome {
        self.session
            .finish(x, y, &mut self.store, &self.renderer, &mut self.surface)
    }

    /// Abandon the active gesture, e.g. when the pointer leaves the canvas
    pub fn cancel_gesture(&mut self) -> bool {
        self.session.cancel(&mut self.surface)
    }

    /// Remove every element touching the rectangle; see [`erase::erase_area`]
    pub fn erase_area(&mut self, x: f32, y: f32, width: f32, height: f32) -> usize {
        erase::erase_area(
            &mut self.store,
            &self.renderer,
            &mut self.surface,
            x,
            y,
            width,
            height,
        )
    }

    /// Repaint the whole scene from the store
    pub fn redraw(&mut self) {
        self.renderer.redraw_all(&mut self.surface, self.store.elements());
    }

    /// Resize the surface and repaint. Pixels are not preserved by a resize,
    /// so the active gesture is abandoned first.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.cancel_gesture();
        self.surface.resize(width, height);
        self.redraw();
        debug!("Canvas resized to {width}x{height}");
    }

    /// Drop every element and blank the surface
    pub fn clear(&mut self) {
        self.cancel_gesture();
        self.store.clear();
        self.surface.clear();
    }

    pub fn export_json(&self) -> PersistenceResult<String> {
        SceneSnapshot::capture(&self.store).to_json()
    }

    /// Replace the scene with a saved one and repaint. On error the current
    /// scene is left untouched.
    pub fn import_json(&mut self, json: &str) -> PersistenceResult<usize> {
        let snapshot = SceneSnapshot::from_json(json)?;
        self.cancel_gesture();
        let restored = snapshot.restore(&mut self.store).len();
        self.redraw();
        info!("Imported scene with {restored} elements");
        Ok(restored)
    }
}
