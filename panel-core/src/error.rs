//! Error types for layout and session operations.

use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while editing a layout or loading a session.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Wall width was zero, negative or not a finite number.
    #[error("Invalid wall width: {0} cm")]
    InvalidWallWidth(f64),

    /// Panel id is not present in the layout.
    #[error("Panel not found: {0}")]
    PanelNotFound(String),

    /// Session record failed schema validation.
    #[error("Malformed session record: {0}")]
    MalformedSessionRecord(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedSessionRecord(err.to_string())
    }
}
