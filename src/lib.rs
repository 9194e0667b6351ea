#![warn(clippy::all, rust_2018_idioms)]

pub mod canvas;
pub mod element;
pub mod erase;
pub mod error;
pub mod geometry;
pub mod id_generator;
pub mod persistence;
pub mod renderer;
pub mod scene;
pub mod surface;
pub mod tools;
pub mod util;

pub use canvas::SketchCanvas;
pub use element::{Element, ElementKind, ElementRef, FillMode, Geometry, NewElement, Style};
pub use error::{PersistenceError, PersistenceResult, ValidationError};
pub use id_generator::ElementId;
pub use persistence::SceneSnapshot;
pub use renderer::{RenderOptions, Renderer};
pub use scene::SceneStore;
pub use surface::{EguiSurface, RasterSurface, Surface};
pub use tools::{SessionOutcome, ToolKind, ToolSession, ToolSettings};
