//! Renderer error types.

use panel_core::LayoutError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Photo bytes could not be decoded.
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// Material key is not in the texture catalog.
    #[error("Missing texture: {0}")]
    MissingTexture(String),

    /// A texture or other resource could not be loaded.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Encoding the output failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Layout error surfaced during rendering.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
