use thiserror::Error;

use crate::element::ElementKind;

/// A decoded element breaks one of the model's constraints
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{kind} element has a non-finite {field}")]
    NonFinite {
        kind: ElementKind,
        field: &'static str,
    },

    #[error("{kind} element has a negative {field}: {value}")]
    Negative {
        kind: ElementKind,
        field: &'static str,
        value: f32,
    },

    #[error("{kind} element has {field} {value} outside [0, 1]")]
    OutOfUnitRange {
        kind: ElementKind,
        field: &'static str,
        value: f32,
    },
}

/// Errors that can occur while importing or exporting element lists
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to (de)serialize scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported scene format version {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u64 },

    #[error("Invalid element at index {index}: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;
