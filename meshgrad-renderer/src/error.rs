//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
///
/// Scene content never causes one of these: bad colors and degenerate points
/// are substituted or skipped. Only the raster itself can fail.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface could not be allocated (zero or overflowing dimensions).
    #[error("Surface error: {0}")]
    Surface(String),

    /// Image encoding failed.
    #[error("Export failed: {0}")]
    Export(String),
}
