use serde::{Deserialize, Serialize};

use crate::element::DEFAULT_PRESSURE;

/// Linear mapping from pen pressure to a stroke-width multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureCurve {
    /// Multiplier at zero pressure
    pub min_scale: f32,
    /// Multiplier at full pressure
    pub max_scale: f32,
}

impl Default for PressureCurve {
    fn default() -> Self {
        // Centred so the default pressure leaves the width unchanged
        Self {
            min_scale: 0.25,
            max_scale: 1.75,
        }
    }
}

impl PressureCurve {
    pub fn scale(&self, pressure: f32) -> f32 {
        let pressure = if pressure.is_finite() {
            pressure.clamp(0.0, 1.0)
        } else {
            DEFAULT_PRESSURE
        };
        self.min_scale + pressure * (self.max_scale - self.min_scale)
    }
}
