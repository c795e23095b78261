//! Error types for scene operations.

use thiserror::Error;

/// Result type for scene operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in scene operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Imported scene document is malformed or incomplete.
    #[error("Invalid scene document: {0}")]
    Format(#[from] FormatError),

    /// Point not found in scene.
    #[error("Point not found: {0}")]
    PointNotFound(String),

    /// Scene serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Structural problem in an imported scene document.
///
/// Reported to the user as a single failure; the live scene is never touched
/// when one of these is produced.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The payload is not valid JSON (or not UTF-8).
    #[error("not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A required field is absent.
    #[error("{path} is missing")]
    Missing {
        /// Dotted path of the field, e.g. `points[2].radius`.
        path: String,
    },

    /// A field is present with the wrong JSON type.
    #[error("{path} must be {expected}")]
    WrongType {
        /// Dotted path of the field.
        path: String,
        /// Human readable expected type.
        expected: &'static str,
    },

    /// A field has the right type but an unusable value.
    #[error("{path} is out of range: {reason}")]
    OutOfRange {
        /// Dotted path of the field.
        path: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

impl FormatError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn wrong_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            path: path.into(),
            expected,
        }
    }

    pub(crate) fn out_of_range(path: impl Into<String>, reason: &'static str) -> Self {
        Self::OutOfRange {
            path: path.into(),
            reason,
        }
    }
}

/// A color string that is not 3- or 6-digit hex.
///
/// Only strict parsing returns this; rendering substitutes a fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid hex color: {0:?}")]
pub struct ColorParseError(pub String);
