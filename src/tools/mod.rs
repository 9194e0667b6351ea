//! Gesture handling: turns pointer input into committed elements or erases.

mod pressure;
mod session;
mod settings;

pub use pressure::PressureCurve;
pub use session::{ERASER_PREVIEW_FILL, ERASER_PREVIEW_STROKE, SessionOutcome, ToolSession};
pub use settings::{ToolKind, ToolSettings};
